#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Cyberdoom experience.

mod overlay;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use cyberdoom_core::RunOutcome;
use cyberdoom_rendering::{FrameControl, FrameInput, Framebuffer, Presentation, RenderingBackend};
use cyberdoom_rendering_macroquad::{MacroquadBackend, DEFAULT_MOUSE_SENSITIVITY};
use cyberdoom_system_analytics::{format_time, Certificate, FileScoreSink, Scoreboard};
use cyberdoom_system_bootstrap::{Bootstrap, Catalog, DEFAULT_DIFFICULTY, DEFAULT_ROLE};
use cyberdoom_system_session::{FrameOutcome, Session, SessionConfig};
use cyberdoom_world::query;

const HEADLESS_FRAME: Duration = Duration::from_micros(16_667);

/// Raycaster security-training shooter.
#[derive(Debug, Parser)]
#[command(name = "cyberdoom", version)]
struct Args {
    /// Name recorded on scores and certificates.
    #[arg(long, default_value = "Guest")]
    name: String,
    /// Player role (junior, soc, engineer, ciso).
    #[arg(long, default_value = DEFAULT_ROLE)]
    role: String,
    /// Difficulty preset (easy, normal, hard, extreme).
    #[arg(long, default_value = DEFAULT_DIFFICULTY)]
    difficulty: String,
    /// One-based level to start on.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    level: u32,
    /// Seed for enemy behavior and drops.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// TOML file replacing the built-in campaign.
    #[arg(long, value_name = "FILE")]
    levels: Option<PathBuf>,
    /// Where the local scoreboard is stored.
    #[arg(long, value_name = "FILE", default_value = "cyberdoom-scores.bin")]
    scores: PathBuf,
    /// Print the local scoreboard and exit.
    #[arg(long)]
    show_scores: bool,
    /// Validate a certificate share code and exit.
    #[arg(long, value_name = "CODE")]
    verify: Option<String>,
    /// Simulate the given number of idle frames without opening a window.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,
    /// Output width in pixels.
    #[arg(long, default_value_t = 960)]
    width: u32,
    /// Output height in pixels.
    #[arg(long, default_value_t = 540)]
    height: u32,
    /// Present frames as fast as possible instead of waiting for vertical sync.
    #[arg(long)]
    no_vsync: bool,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
    /// Mouse turn sensitivity.
    #[arg(long, default_value_t = DEFAULT_MOUSE_SENSITIVITY)]
    mouse_sensitivity: f32,
}

/// Entry point for the Cyberdoom command-line interface.
fn main() -> Result<()> {
    let _ = env_logger::Builder::from_default_env().try_init();
    let args = Args::parse();

    if let Some(code) = &args.verify {
        return verify(code);
    }
    if args.show_scores {
        return show_scores(&args.scores);
    }

    let catalog = load_catalog(args.levels.as_deref())?;
    let config = SessionConfig {
        player_name: args.name.clone(),
        role: args.role.clone(),
        difficulty: args.difficulty.clone(),
        level: usize::try_from(args.level - 1).context("level index out of range")?,
        seed: args.seed,
    };
    let sink = Box::new(FileScoreSink::new(args.scores.clone()));
    let session = Session::new(catalog, config, sink).context("failed to start session")?;

    println!("{}", Bootstrap::default().welcome_banner(session.world()));
    println!("{}", session.briefing());

    match args.headless {
        Some(frames) => run_headless(session, frames, args.width, args.height),
        None => run_windowed(session, &args),
    }
}

fn load_catalog(levels: Option<&Path>) -> Result<Catalog> {
    let Some(path) = levels else {
        return Catalog::builtin().context("built-in tables are invalid");
    };
    let document = fs::read_to_string(path)
        .with_context(|| format!("failed to read levels from {}", path.display()))?;
    Catalog::with_levels(&document)
        .with_context(|| format!("failed to load levels from {}", path.display()))
}

fn verify(code: &str) -> Result<()> {
    let certificate = Certificate::decode(code).context("certificate is not valid")?;
    println!(
        "Certificate {} is valid: {} scored {} on level {} in {}",
        certificate.id(),
        certificate.name(),
        certificate.score(),
        certificate.level(),
        certificate.time_label()
    );
    Ok(())
}

fn show_scores(path: &Path) -> Result<()> {
    let scoreboard = Scoreboard::load(path).context("failed to load scoreboard")?;
    if scoreboard.entries().is_empty() {
        println!("No scores recorded yet.");
    }
    for (rank, entry) in scoreboard.entries().iter().enumerate() {
        println!(
            "{:>2}. {:<16} {:>6}  {}  {} ({}/{})",
            rank + 1,
            entry.name,
            entry.score,
            format_time(Duration::from_millis(entry.time_ms)),
            entry.level_name,
            entry.role,
            entry.difficulty
        );
    }
    Ok(())
}

fn run_headless(mut session: Session, frames: u32, width: u32, height: u32) -> Result<()> {
    let mut surface = Framebuffer::new(width, height).context("invalid headless resolution")?;
    for _ in 0..frames {
        let outcome = session.frame(HEADLESS_FRAME, FrameInput::default(), &mut surface);
        if let FrameOutcome::Completed(report) = outcome {
            log::info!(
                "run completed after {} with accuracy {:.2}",
                format_time(report.stats.elapsed),
                report.accuracy()
            );
            break;
        }
    }

    let hud = session.hud();
    println!(
        "{} after {}: score {}, health {:.0}/{:.0}, energy {:.0}/{:.0}",
        hud.level_name,
        format_time(query::now(session.world())),
        hud.score,
        hud.health,
        hud.max_health,
        hud.energy,
        hud.max_energy
    );
    if let Some(summary) = session.summary() {
        println!("{}: {}", summary.title, summary.text);
    }
    if let Some(certificate) = session.certificate() {
        println!("Certificate: {}", certificate.share_code()?);
    }
    Ok(())
}

fn run_windowed(mut session: Session, args: &Args) -> Result<()> {
    let presentation = Presentation::new("Cyberdoom", args.width, args.height)?;
    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps)
        .with_mouse_sensitivity(args.mouse_sensitivity);

    let mut interact_held = false;
    backend.run(presentation, move |dt, input, surface| {
        if input.quit {
            return FrameControl::Exit;
        }
        let interact_pressed = input.controls.interact && !interact_held;
        interact_held = input.controls.interact;
        let was_over = query::is_complete(session.world());

        if let FrameOutcome::Completed(report) = session.frame(dt, input, surface) {
            if report.won() {
                log_certificate(session.certificate());
            }
        }

        if session.is_paused() {
            overlay::draw_paused(surface, session.briefing());
            return FrameControl::Continue;
        }

        match session.summary() {
            Some(summary) => {
                let won = query::outcome(session.world()) == Some(RunOutcome::Won);
                overlay::draw_summary(surface, &summary, won);
                match after_run(was_over, interact_pressed, won) {
                    AfterRun::Stay => {}
                    AfterRun::NextLevel => session.next_level(),
                    AfterRun::Retry => session.retry(),
                }
            }
            None => overlay::draw_hud(surface, &session.hud()),
        }
        FrameControl::Continue
    })
}

/// What the end-of-run panel does with a frame's input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AfterRun {
    /// Keep showing the panel.
    Stay,
    /// Load the next level, wrapping after the last one.
    NextLevel,
    /// Reload the level that was just lost.
    Retry,
}

/// Only a press made while the panel was already up advances; the press that
/// finished the run must not also dismiss its summary.
fn after_run(was_over: bool, interact_pressed: bool, won: bool) -> AfterRun {
    match (was_over && interact_pressed, won) {
        (false, _) => AfterRun::Stay,
        (true, true) => AfterRun::NextLevel,
        (true, false) => AfterRun::Retry,
    }
}

fn log_certificate(certificate: Option<Certificate>) {
    let Some(certificate) = certificate else {
        return;
    };
    match certificate.share_code() {
        Ok(code) => log::info!("certificate {} issued: {code}", certificate.id()),
        Err(error) => log::warn!("failed to encode certificate: {error}"),
    }
}
