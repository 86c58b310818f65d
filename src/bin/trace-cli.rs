use clap::{Parser, ValueEnum};

use sevendraw::engine::apply::apply_action;
use sevendraw::policy::ai_hint;
use sevendraw::{ai_trace, GameState, Mode};

#[derive(Debug, Clone, ValueEnum)]
enum ModeOpt {
    Practice,
    Challenge,
}

#[derive(Debug, Parser)]
#[command(name = "trace-cli", about = "Sevendraw deterministic game walkthrough")]
struct Args {
    /// Deck seed
    #[arg(long, default_value_t = 0x00C0_FFEE_u64)]
    seed: u64,

    /// Game mode
    #[arg(long, value_enum, default_value_t = ModeOpt::Practice)]
    mode: ModeOpt,

    /// Challenge target score (challenge mode only)
    #[arg(long)]
    target: Option<u64>,

    /// Print the projected order-unknown trace instead of walking the
    /// realized game
    #[arg(long, default_value_t = false)]
    projected: bool,
}

fn print_state(state: &GameState) {
    let view = state.public_view();
    let hand: Vec<String> = view.hand.iter().map(ToString::to_string).collect();
    println!(
        "hand [{}]  p={} d={} score={} deck_remaining={}",
        hand.join(" "),
        view.p_remaining,
        view.d_remaining,
        view.score_total,
        view.deck_remaining_count
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mode = match args.mode {
        ModeOpt::Practice => Mode::Practice,
        ModeOpt::Challenge => Mode::Challenge,
    };

    if args.projected {
        let artifact = ai_trace(args.seed, mode, args.target);
        println!("{}", serde_json::to_string_pretty(&artifact)?);
        return Ok(());
    }

    let (mut state, events) = GameState::from_seed(args.seed, mode, args.target);
    for e in &events {
        println!("[trace] event {}", e.message_key);
    }
    print_state(&state);

    // Walk the heuristic's own recommendations against the realized deck.
    let mut turn = 0usize;
    while !state.is_terminal() {
        let Some(hint) = ai_hint(&state.public_view()) else {
            break;
        };
        turn += 1;
        println!(
            "turn {}: {} {:?}",
            turn,
            hint.action.kind_str(),
            hint.action.selected_indices()
        );
        let (next, events) = apply_action(&state, &hint.action)
            .map_err(|e| format!("recommended action failed: {e}"))?;
        state = next;
        for e in &events {
            println!("[trace] event {} {}", e.message_key, e.params);
        }
        print_state(&state);
    }

    println!("final score: {}", state.score_total());
    Ok(())
}
