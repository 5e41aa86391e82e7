//! # Bramble Main Entry Point
//!
//! Initializes logging, builds the world and game state, sets up the
//! macroquad display, and runs the frame loop.

use bramble::{
    config, levels, BrambleResult, CompletionState, Display, FrameClock, GameEvent, GameState,
    KeyState, VERSION,
};
use clap::Parser;
use log::info;
use macroquad::prelude::*;

/// Command line arguments for Bramble.
#[derive(Parser, Debug)]
#[command(name = "bramble")]
#[command(about = "A 2D top-down tile adventure with scrolling maps and wandering monsters")]
#[command(version)]
struct Args {
    /// Random seed for monster wandering
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Bramble".to_string(),
        window_width: config::WINDOW_WIDTH,
        window_height: config::WINDOW_HEIGHT,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() -> BrambleResult<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&args.log_level),
    )
    .init();

    info!("starting Bramble v{}", VERSION);

    set_pc_assets_folder("assets");

    let seed = args.seed.unwrap_or(12345);
    let world = levels::builtin_world()?;
    let mut state = GameState::new(world, levels::PLAYER_START, seed)?;

    let mut display = Display::new().await;
    display.load_level(state.world.current_level()).await;

    // Key state and the frame clock are owned here and threaded into each
    // step; nothing in the simulation reads ambient input or time.
    let mut clock = FrameClock::new();

    loop {
        let keys = KeyState::sample();
        let dt = clock.tick(get_time());

        let events = state.tick(dt, &keys)?;
        for event in &events {
            match event {
                GameEvent::LevelChanged { .. } => {
                    // Recomposite before anything of the new level is drawn.
                    display.load_level(state.world.current_level()).await;
                }
                GameEvent::GameOver => {
                    info!("game over");
                }
                _ => {}
            }
        }

        display.draw(&state);

        if state.completion == CompletionState::GameOver {
            draw_game_over_banner();
        }

        next_frame().await;
    }
}

/// Overlays the terminal-state banner once the last heart is gone.
fn draw_game_over_banner() {
    let text = "GAME OVER";
    let size = 64.0;
    let dims = measure_text(text, None, size as u16, 1.0);
    draw_text(
        text,
        (screen_width() - dims.width) / 2.0,
        screen_height() / 2.0,
        size,
        RED,
    );
}
