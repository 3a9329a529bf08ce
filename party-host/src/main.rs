use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use party_host::{HostConfig, MatchHost, init_tracing};
use party_types::{MatchState, Phase, Signal, WordSource};

const HELP: &str = "commands: add <name> | remove <name> | start | ready | choose <n> | correct \
| toggle <name> | cancel | submit | skip | next | continue | end | new | exit \
| source <ai|custom> | state | hint | quit";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = HostConfig::from_env()?;
    info!("Starting Sketch Party host...");
    let host = MatchHost::from_config(&config).await?;

    let mut events = host.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!("{:?}", event);
        }
    });
    let mut notices = host.subscribe_notices();
    tokio::spawn(async move {
        while let Ok(notice) = notices.recv().await {
            warn!("{:?}", notice);
        }
    });

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "quit" {
            break;
        }
        if let Err(e) = run_command(&host, line).await {
            println!("error: {}", e);
        }
    }

    host.shutdown();
    info!("Host stopped.");
    Ok(())
}

async fn run_command(host: &MatchHost, line: &str) -> Result<()> {
    let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
    let arg = arg.trim();

    let signal = match command {
        "add" => Signal::AddPlayer {
            name: arg.to_string(),
        },
        "remove" => Signal::RemovePlayer {
            player_id: player_id(&host.snapshot().await, arg)?,
        },
        "start" => {
            host.start_match().await?;
            return Ok(());
        }
        "ready" => Signal::Ready,
        "choose" => Signal::ChoosePrompt {
            index: arg.parse()?,
        },
        "correct" => Signal::MarkCorrect,
        "toggle" => Signal::ToggleGuesser {
            player_id: player_id(&host.snapshot().await, arg)?,
        },
        "cancel" => Signal::CancelConfirm,
        "submit" => Signal::SubmitScore,
        "skip" => Signal::Skip,
        "next" => Signal::NextTurn,
        "continue" => Signal::ContinueFromLeaderboard,
        "end" => Signal::EndEarly,
        "new" => Signal::NewMatch,
        "exit" => Signal::Exit,
        "source" => {
            let source = WordSource::parse(arg)
                .ok_or_else(|| anyhow::anyhow!("unknown word source '{}'", arg))?;
            host.set_word_source(source).await?;
            return Ok(());
        }
        "state" => {
            print_state(&host.snapshot().await);
            return Ok(());
        }
        "hint" => {
            match host.hint().await.and_then(|h| h.masked()) {
                Some(mask) => println!("{}", mask),
                None => println!("(hidden)"),
            }
            return Ok(());
        }
        _ => {
            println!("{}", HELP);
            return Ok(());
        }
    };

    host.dispatch(signal).await?;
    Ok(())
}

fn player_id(state: &MatchState, name: &str) -> Result<party_types::PlayerId> {
    state
        .players
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .map(|p| p.id)
        .ok_or_else(|| anyhow::anyhow!("no player named '{}'", name))
}

fn print_state(state: &MatchState) {
    let turn = &state.turn;
    println!(
        "{:?} | round {}/{} | timer {}",
        state.phase, turn.round, turn.max_rounds, turn.timer
    );
    if let Some(drawer) = state.drawer() {
        println!("drawer: {}", drawer.name);
    }
    for (i, prompt) in turn.prompt_choices.iter().enumerate() {
        println!("  [{}] {} ({}, {:?})", i, prompt.word, prompt.category, prompt.difficulty);
    }
    for standing in state.standings() {
        println!("  #{} {} - {}", standing.rank, standing.name, standing.score);
    }
    if matches!(state.phase, Phase::RoundLeaderboard | Phase::GameOver) {
        let leaders: Vec<&str> = state.leaders().iter().map(|p| p.name.as_str()).collect();
        let label = if state.phase == Phase::GameOver { "winner" } else { "leading" };
        println!("{}: {}", label, leaders.join(", "));
    }
}
