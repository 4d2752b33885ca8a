use chrono::Utc;
use clap::Parser;
use crossterm::{
    cursor::MoveTo,
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use jihwa_core::card::{
    format_phone, share_data_url, share_url, CardDesign, CardDocument, ContactInput, LayoutDirection,
};
use jihwa_core::config::KioskConfig;
use jihwa_core::core::types::{AsJamo, JamoLetter, SyllableGroup};
use jihwa_core::logger::init_logger;
use jihwa_core::persistence::{CardStore, EvictionWorker};
use jihwa_core::{Result, Session};
use std::io::{stdin, stdout, Stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "jihwa-kiosk")]
#[command(about = "Fingerspelling business card kiosk")]
struct Args {
    /// Path to the TOML config file. Falls back to kiosk.toml when it exists.
    #[arg(short, long, env = "JIHWA_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

struct Kiosk {
    session: Session,
    contact: ContactInput,
    design: CardDesign,
    layout: LayoutDirection,
    status: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = KioskConfig::resolve(args.config.as_deref())?;
    let store = Arc::new(CardStore::open(&config.store_dir, config.retention()?)?);
    let _sweeper = EvictionWorker::spawn(Arc::clone(&store), config.sweep_interval());

    let mut kiosk = Kiosk {
        session: Session::new(),
        contact: ContactInput::default(),
        design: config.default_design,
        layout: config.default_layout,
        status: String::new(),
    };
    let mut out = stdout();

    loop {
        print_ui(&mut out, &kiosk)?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();
        kiosk.status.clear();

        match cmd.split_once(' ').unwrap_or((cmd, "")) {
            ("exit", _) => break,
            ("<", _) | ("back", _) => {
                kiosk.session.backspace();
            }
            ("clear", _) => kiosk.session.clear(),
            ("name", name) => kiosk.session.set_target(name.trim()),
            ("phone", digits) => {
                for c in digits.chars() {
                    kiosk.contact.push_digit(c);
                }
            }
            ("phone<", _) => {
                kiosk.contact.backspace();
            }
            ("design", id) => match id.trim().parse() {
                Ok(design) => kiosk.design = design,
                Err(e) => kiosk.status = e.to_string(),
            },
            ("layout", dir) => match dir.trim().parse() {
                Ok(layout) => kiosk.layout = layout,
                Err(e) => kiosk.status = e.to_string(),
            },
            ("done", _) => {
                kiosk.status = match finish_card(&kiosk, &store, &config) {
                    Ok((url, data_url)) => {
                        kiosk.session.clear();
                        kiosk.contact = ContactInput::default();
                        format!("Card saved. Share link: {url}\nOffline link: {data_url}")
                    }
                    Err(e) => {
                        error!(error = %e, "could not save card");
                        format!("Could not save card: {e}")
                    }
                }
            }
            ("load", id) => {
                kiosk.status = match store.load(id.trim()) {
                    Ok(Some(doc)) => format!(
                        "{} | {} | {} | {}",
                        doc.user_name,
                        render_groups(&doc.groups()),
                        doc.design,
                        format_phone(&doc.phone_number)
                    ),
                    Ok(None) => "Card not found.".to_string(),
                    Err(e) => e.to_string(),
                }
            }
            ("cleanup", _) => {
                kiosk.status = match store.evict_expired(Utc::now()) {
                    Ok(n) => format!("Deleted {n} expired card(s)."),
                    Err(e) => e.to_string(),
                }
            }
            _ => {
                // Anything else is a run of tile taps.
                for c in cmd.chars().filter(|c| !c.is_whitespace()) {
                    if let Err(e) = kiosk.session.tap(c) {
                        kiosk.status = e.to_string();
                        break;
                    }
                }
            }
        }
    }

    info!("kiosk shutting down");
    Ok(())
}

/// Saves the card and returns its store-backed and self-contained share links.
fn finish_card(kiosk: &Kiosk, store: &CardStore, config: &KioskConfig) -> Result<(String, String)> {
    let doc = CardDocument::from_session(
        &kiosk.session,
        &kiosk.contact,
        kiosk.design,
        kiosk.layout,
        config.sign_size,
        Utc::now(),
    )?;
    let id = doc.id();
    store.save(&id, &doc)?;
    let data_url = share_data_url(&config.share_base_url, &doc)?;
    Ok((share_url(&config.share_base_url, &id), data_url))
}

fn render_groups<T: AsJamo>(groups: &[SyllableGroup<T>]) -> String {
    groups
        .iter()
        .map(|g| format!("[{}]", g.iter().map(|l| l.jamo().to_string()).collect::<Vec<_>>().join(" ")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_prompt(letter: Option<&JamoLetter>) -> String {
    match letter {
        Some(letter) => format!("{} ({})", letter.character, letter.asset),
        None => "-".to_string(),
    }
}

fn print_ui(out: &mut Stdout, kiosk: &Kiosk) -> std::io::Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    execute!(
        out,
        SetForegroundColor(Color::Cyan),
        Print("Fingerspelling Card Kiosk\n"),
        ResetColor
    )?;
    writeln!(out, "---------------------------------------------------------------")?;
    writeln!(out, "Type jamo to tap tiles, '<' to delete, 'clear' to restart.")?;
    writeln!(out, "'name 홍길동' to spell along, 'phone 010...', 'design luxury',")?;
    writeln!(out, "'layout v', 'done' to save, 'load <id>', 'cleanup', 'exit'.\n")?;

    writeln!(out, "Tiles:   {}", render_groups(&kiosk.session.groups()))?;
    writeln!(out, "Name:    {}", kiosk.session.composed_name())?;
    if !kiosk.session.target().is_empty() {
        let color = if kiosk.session.is_on_track() { Color::Green } else { Color::Red };
        execute!(
            out,
            SetForegroundColor(color),
            Print(format!("Next:    {}\n", render_prompt(kiosk.session.next_expected()))),
            ResetColor
        )?;
    }
    writeln!(out, "Phone:   {}", kiosk.contact.formatted())?;
    writeln!(out, "Design:  {}   Layout: {:?}", kiosk.design, kiosk.layout)?;

    if !kiosk.status.is_empty() {
        execute!(
            out,
            SetForegroundColor(Color::Yellow),
            Print(format!("\n{}\n", kiosk.status)),
            ResetColor
        )?;
    }
    write!(out, "\n> ")?;
    out.flush()
}
