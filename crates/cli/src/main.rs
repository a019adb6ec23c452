use cubehub_core::{
    Card, Currency, Event, GameHub, HubError, Minigame, Reveal, RunPhase, SaveData,
    ShopId, Stake, UpgradeTree, SAVE_VERSION,
};
use cubehub_data::load_assets;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_SEED: u64 = 0xC0FFEE;

#[derive(Debug, Clone)]
struct CliOptions {
    seed: u64,
    assets: PathBuf,
    save: Option<PathBuf>,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut seed = DEFAULT_SEED;
    let mut assets = PathBuf::from("assets");
    let mut save = default_state_path();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    match value.parse::<u64>() {
                        Ok(parsed) => seed = parsed,
                        Err(_) => eprintln!("warning: ignoring invalid seed '{value}'"),
                    }
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    assets = PathBuf::from(value);
                    idx += 1;
                }
            }
            "--save" => {
                if let Some(value) = args.get(idx + 1) {
                    save = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            other => eprintln!("warning: unknown argument '{other}'"),
        }
        idx += 1;
    }
    CliOptions { seed, assets, save }
}

fn default_state_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("CUBEHUB_SAVE") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cubehub_save.json"))
}

fn parse_optional_path(args: &[&str], fallback: Option<&Path>) -> Option<PathBuf> {
    args.first()
        .map(PathBuf::from)
        .or_else(|| fallback.map(Path::to_path_buf))
}

fn save_state_file(hub: &GameHub, path: &Path) -> Result<(), String> {
    let body = serde_json::to_string_pretty(&hub.snapshot()).map_err(|err| err.to_string())?;
    fs::write(path, body).map_err(|err| err.to_string())?;
    debug!(path = %path.display(), "state saved");
    Ok(())
}

/// Older versions load and merge with defaults; newer ones are refused.
fn load_state_file(path: &Path) -> Result<SaveData, String> {
    let body = fs::read_to_string(path).map_err(|err| err.to_string())?;
    let payload: SaveData = serde_json::from_str(&body).map_err(|err| err.to_string())?;
    if payload.version > SAVE_VERSION {
        return Err(format!(
            "unsupported save version {} (expected at most {})",
            payload.version, SAVE_VERSION
        ));
    }
    Ok(payload)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_hub(options: &CliOptions) -> anyhow::Result<GameHub> {
    let assets = load_assets(&options.assets)?;
    info!(seed = options.seed, assets = %options.assets.display(), "assets loaded");
    let mut hub = GameHub::new(assets.config, assets.content, options.seed);
    match assets.words {
        Some(words) => hub.words = words,
        None => eprintln!(
            "warning: no word list in {}; the letter game cannot score words",
            options.assets.display()
        ),
    }
    Ok(hub)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    init_tracing();
    let mut hub = match build_hub(&options) {
        Ok(hub) => hub,
        Err(err) => {
            eprintln!("setup error: {err:#}");
            std::process::exit(1);
        }
    };
    if let Some(path) = options.save.as_deref().filter(|path| path.exists()) {
        match load_state_file(path) {
            Ok(save) => {
                hub.restore(&save);
                println!("loaded {}", path.display());
            }
            Err(err) => eprintln!("load warning: {err}"),
        }
    }
    run_repl(&mut hub, &options);
}

fn run_repl(hub: &mut GameHub, options: &CliOptions) {
    print_help();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(err)) => {
                eprintln!("input error: {err}");
                break;
            }
            None => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        let result = match cmd {
            "help" | "h" | "?" => {
                print_help();
                Ok(())
            }
            "quit" | "exit" => break,
            "click" | "c" => hub.click().map(|outcome| {
                println!(
                    "+{} money, health {}{}",
                    outcome.earned,
                    outcome.health,
                    outcome
                        .cooldown
                        .map(|secs| format!(", recovering for {secs}s"))
                        .unwrap_or_default()
                );
                if outcome.shop_revealed {
                    println!("the shop is open: try `shop main`");
                }
            }),
            "tick" => {
                match args.first().map(|raw| raw.parse::<u32>()) {
                    Some(Ok(secs)) => {
                        if hub.tick(secs) {
                            println!("the cube recovered");
                        }
                    }
                    _ => println!("usage: tick <seconds>"),
                }
                Ok(())
            }
            "status" | "s" => {
                print_status(hub);
                Ok(())
            }
            "shop" => {
                match args.first().and_then(|raw| ShopId::from_id(raw)) {
                    Some(shop) => print_shop(hub, shop),
                    None => println!("usage: shop <{}>", shop_names()),
                }
                Ok(())
            }
            "buy" => match (args.first().and_then(|raw| ShopId::from_id(raw)), args.get(1)) {
                (Some(shop), Some(id)) => hub.try_purchase(shop, id).map(|receipt| {
                    println!(
                        "bought {} for {} {} (owned {})",
                        receipt.id,
                        receipt.price,
                        shop.currency().id(),
                        receipt.count
                    );
                }),
                _ => {
                    println!("usage: buy <{}> <upgrade-id>", shop_names());
                    Ok(())
                }
            },
            "card" => handle_card(hub, &args),
            "letters" | "l" => handle_letters(hub, &args),
            "wager" | "w" => handle_wager(hub, &args),
            "snake" => match args.first().map(|raw| raw.parse::<i64>()) {
                Some(Ok(foods)) => hub.snake_finished(foods).map(|emeralds| {
                    println!("snake settled: +{emeralds} emeralds");
                }),
                _ => {
                    println!("usage: snake <foods eaten>");
                    Ok(())
                }
            },
            "tetris" => match args.first().map(|raw| raw.parse::<i64>()) {
                Some(Ok(score)) => hub.tetris_finished(score).map(|sapphires| {
                    println!("tetris settled: +{sapphires} sapphires");
                }),
                _ => {
                    println!("usage: tetris <score>");
                    Ok(())
                }
            },
            "save" => {
                match parse_optional_path(&args, options.save.as_deref()) {
                    Some(path) => match save_state_file(hub, &path) {
                        Ok(()) => println!("saved {}", path.display()),
                        Err(err) => println!("error: save failed: {err}"),
                    },
                    None => println!("save path unavailable"),
                }
                Ok(())
            }
            "load" => {
                match parse_optional_path(&args, options.save.as_deref()) {
                    Some(path) => match load_state_file(&path) {
                        Ok(save) => {
                            hub.restore(&save);
                            println!("loaded {}", path.display());
                        }
                        Err(err) => println!("error: load failed: {err}"),
                    },
                    None => println!("save path unavailable"),
                }
                Ok(())
            }
            _ => {
                println!("unknown command '{cmd}', type `help`");
                Ok(())
            }
        };
        if let Err(err) = result {
            println!("error: {err}");
        }
        drain_events(hub);
    }
}

fn handle_card(hub: &mut GameHub, args: &[&str]) -> Result<(), HubError> {
    match args.first().copied().unwrap_or("hand") {
        "start" => {
            hub.start_card_run()?;
            print_table(hub);
        }
        "hand" => print_table(hub),
        "select" => match parse_indices_result(&args[1..]) {
            Ok(indices) => {
                let run = hub.card_run_mut()?;
                run.select_indices(&indices)?;
                let preview = run.preview();
                println!(
                    "{}: {} x {:.1} = {}",
                    preview.hand.display_name(),
                    preview.total_chips,
                    preview.total_mult.max(1.0),
                    preview.total
                );
            }
            Err(err) => println!("usage: card select <indices>: {err}"),
        },
        "play" => {
            let outcome = hub.card_play()?;
            println!(
                "{} scored {} ({} chips x {:.1})",
                outcome.breakdown.hand.display_name(),
                outcome.breakdown.total,
                outcome.breakdown.total_chips,
                outcome.breakdown.total_mult.max(1.0)
            );
            match outcome.phase {
                RunPhase::RoundComplete => println!("round complete: `card next` to continue"),
                RunPhase::GameOver => println!("game over: `card restart` to cash in spades"),
                RunPhase::Active => {}
            }
            print_table(hub);
        }
        "discard" => {
            let drawn = hub.card_discard()?;
            println!("discarded, drew {drawn}");
            print_table(hub);
        }
        "next" => {
            let summary = hub.card_advance()?;
            println!(
                "round {} target {} (+{} spades banked, {} now level {})",
                summary.round,
                summary.next_target,
                summary.reward,
                summary.levelled.display_name(),
                summary.level
            );
            print_table(hub);
        }
        "buy" => match args.get(1).and_then(|raw| raw.parse::<usize>().ok()) {
            Some(index) => {
                let joker = hub.card_buy_joker(index)?;
                println!("bought joker {}", joker.name);
            }
            None => println!("usage: card buy <offer index>"),
        },
        "skip" => {
            hub.card_run_mut()?.skip_shop()?;
            println!("offers skipped");
        }
        "restart" => {
            let payout = hub.card_restart()?;
            println!("run restarted, +{payout} spades");
            print_table(hub);
        }
        other => println!("unknown card command '{other}'"),
    }
    Ok(())
}

fn handle_letters(hub: &mut GameHub, args: &[&str]) -> Result<(), HubError> {
    match args.first().copied().unwrap_or("show") {
        "show" => {
            hub.letters_mut()?;
            print_letters(hub);
        }
        "place" => {
            let letters = hub.letters_mut()?;
            for letter in args[1..].iter().flat_map(|arg| arg.chars()) {
                letters.place_letter(letter)?;
            }
            let preview = letters.preview();
            println!("{} = {}", preview.word, preview.score);
        }
        "remove" => {
            if hub.letters_mut()?.remove_last().is_none() {
                println!("no tiles placed");
            }
            print_letters(hub);
        }
        "clear" => {
            hub.letters_mut()?.clear_slots();
            print_letters(hub);
        }
        "discard" => match args.get(1).and_then(|raw| raw.parse::<usize>().ok()) {
            Some(index) => {
                let letters = hub.letters_mut()?;
                match letters.hand.get(index).map(|tile| tile.id) {
                    Some(id) => letters.discard_tile(id)?,
                    None => println!("no tile at {index}"),
                }
                print_letters(hub);
            }
            None => println!("usage: letters discard <hand index>"),
        },
        "reroll" => {
            let drawn = hub.letters_reroll()?;
            println!("drew {drawn} tiles");
            print_letters(hub);
        }
        "submit" => {
            let outcome = hub.letters_submit()?;
            println!(
                "{} scored {} tiles ({} chips x {:.1})",
                outcome.word, outcome.score, outcome.chips, outcome.mult
            );
            print_letters(hub);
        }
        "new" => {
            hub.letters_new_hand()?;
            print_letters(hub);
        }
        "hint" => {
            let letters: Vec<char> = hub
                .letters_mut()?
                .hand
                .iter()
                .map(|tile| tile.letter)
                .collect();
            let found = hub.words.find_words_from_letters(&letters, 2)?;
            if found.is_empty() {
                println!("no words in this hand");
            } else {
                let shown: Vec<&str> = found.iter().take(10).map(String::as_str).collect();
                println!("try: {}", shown.join(", "));
            }
        }
        other => println!("unknown letters command '{other}'"),
    }
    Ok(())
}

fn handle_wager(hub: &mut GameHub, args: &[&str]) -> Result<(), HubError> {
    match args.first().copied().unwrap_or("board") {
        "open" => {
            let numbers: Result<Vec<i64>, _> =
                args[1..].iter().map(|raw| raw.parse::<i64>()).collect();
            match numbers.as_deref() {
                Ok([money, diamonds, emeralds, tiles, bombs]) if *bombs > 0 => {
                    let stake = Stake {
                        money: *money,
                        diamonds: *diamonds,
                        emeralds: *emeralds,
                        tiles: *tiles,
                    };
                    hub.wager_open(stake, *bombs as usize)?;
                    print_board(hub);
                }
                _ => println!("usage: wager open <money> <diamonds> <emeralds> <tiles> <bombs>"),
            }
        }
        "reveal" => match args.get(1).and_then(|raw| raw.parse::<usize>().ok()) {
            Some(index) => {
                match hub.wager_reveal(index)? {
                    Reveal::Diamond => println!("diamond!"),
                    Reveal::Bomb => println!("bomb: the stake is lost"),
                    Reveal::AlreadyRevealed => println!("already revealed"),
                }
                print_board(hub);
            }
            None => println!("usage: wager reveal <square>"),
        },
        "cashout" => {
            let payout = hub.wager_cash_out()?;
            println!(
                "cashed out: {} money, {} diamonds, {} emeralds, {} tiles",
                payout.money, payout.diamonds, payout.emeralds, payout.tiles
            );
        }
        "board" => print_board(hub),
        other => println!("unknown wager command '{other}'"),
    }
    Ok(())
}

fn parse_indices_result(args: &[&str]) -> Result<Vec<usize>, String> {
    if args.is_empty() {
        return Err("missing indices".to_string());
    }
    let mut indices = Vec::new();
    for arg in args {
        for part in arg.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some((start, end)) = part.split_once('-') {
                let start = start
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| "invalid range start".to_string())?;
                let end = end
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| "invalid range end".to_string())?;
                if start > end {
                    return Err("range start larger than end".to_string());
                }
                indices.extend(start..=end);
            } else {
                let idx = part
                    .parse::<usize>()
                    .map_err(|_| format!("invalid index '{part}'"))?;
                indices.push(idx);
            }
        }
    }
    if indices.is_empty() {
        return Err("missing indices".to_string());
    }
    Ok(indices)
}

fn shop_names() -> String {
    ShopId::ALL
        .iter()
        .map(|shop| shop.id())
        .collect::<Vec<_>>()
        .join("|")
}

fn print_help() {
    println!("commands:");
    for line in [
        "click | tick <secs> | status",
        "shop <name> | buy <shop> <upgrade-id>",
        "card start|hand|select <i..>|play|discard|next|buy <i>|skip|restart",
        "letters show|place <letters>|remove|clear|discard <i>|reroll|submit|new|hint",
        "wager open <money> <diamonds> <emeralds> <tiles> <bombs> | wager reveal <i> | wager cashout",
        "snake <foods> | tetris <score>",
        "save [path] | load [path] | quit",
    ] {
        println!("  {line}");
    }
}

fn print_status(hub: &GameHub) {
    println!("== Balances ==");
    for currency in Currency::ALL {
        println!("{:>10}  {}", currency.id(), hub.balance(currency));
    }
    let cube = &hub.progression.cube;
    println!("== Cube ==");
    println!(
        "health {}/{}  click value {}  recovery {}s{}",
        cube.health,
        cube.max_health,
        cube.click_value,
        cube.cooldown_duration(),
        cube.cooldown
            .map(|secs| format!("  (recovering, {secs}s left)"))
            .unwrap_or_default()
    );
    println!("== Games ==");
    for game in Minigame::ALL {
        let state = if hub.is_unlocked(game) { "open" } else { "locked" };
        println!("{:>10}  {state}", game.id());
    }
}

fn print_shop(hub: &GameHub, shop: ShopId) {
    let Some(tree) = hub.tree(shop) else {
        println!("no {} shop", shop.id());
        return;
    };
    println!(
        "== {} shop ({}: {}) ==",
        shop.id(),
        shop.currency().id(),
        hub.balance(shop.currency())
    );
    for def in tree.defs() {
        println!(
            "{:<24} {:>8}  {:>5}  {}",
            def.id,
            upgrade_status(tree, &def.id),
            format!("{}/{}", tree.count(&def.id), def.max_purchases),
            def.name
        );
    }
}

fn upgrade_status(tree: &UpgradeTree, id: &str) -> String {
    if tree.state(id).maxed {
        "maxed".to_string()
    } else if !tree.is_unlocked(id) {
        "locked".to_string()
    } else {
        tree.current_price(id)
            .map(|price| price.to_string())
            .unwrap_or_default()
    }
}

fn format_card(card: &Card) -> String {
    let mut out = format!("{}{}", card.rank.label(), card.suit.symbol());
    if let Some(enhancement) = card.enhancement {
        out.push_str(&format!(" [{enhancement:?}]"));
    }
    if let Some(seal) = card.seal {
        out.push_str(&format!(" <{seal:?}>"));
    }
    out
}

fn print_table(hub: &GameHub) {
    let Some(run) = hub.card_run.as_ref() else {
        println!("no card run: `card start`");
        return;
    };
    let state = &run.state;
    println!(
        "== Round {} ({:?}) score {}/{}  hands {}  discards {}  spades {} ==",
        state.round,
        state.phase,
        state.score,
        state.target,
        state.hands_left,
        state.discards_left,
        state.pending_reward
    );
    for (idx, card) in run.hand.iter().enumerate() {
        let mark = if run.selected.contains(&card.id) { "*" } else { " " };
        println!("{idx:>3}{mark} {:<10} {:>3} chips", format_card(card), card.chips);
    }
    if !run.inventory.jokers.is_empty() {
        let names: Vec<&str> = run
            .inventory
            .jokers
            .iter()
            .map(|joker| joker.def.name.as_str())
            .collect();
        println!("jokers: {}", names.join(", "));
    }
    if let Some(shop) = run.shop.as_ref() {
        println!("== Joker offers (`card buy <i>` / `card skip`) ==");
        for (idx, offer) in shop.offers.iter().enumerate() {
            println!("{idx:>3}  {:<20} {:>3} spades", offer.def.name, offer.price);
        }
    }
}

fn print_letters(hub: &GameHub) {
    let game = &hub.letters;
    let slots: String = game
        .slots
        .iter()
        .map(|slot| slot.map_or('_', |tile| tile.letter))
        .collect();
    println!("word  [{slots}]  best {}", game.best_score);
    let hand: Vec<String> = game
        .hand
        .iter()
        .enumerate()
        .map(|(idx, tile)| format!("{idx}:{}({})", tile.letter, tile.chips))
        .collect();
    println!("hand  {}", hand.join(" "));
    if !game.discards.is_empty() {
        let discards: String = game.discards.iter().map(|tile| tile.letter).collect();
        println!("discard zone  {discards}");
    }
}

fn print_board(hub: &GameHub) {
    let Some(session) = hub.wager.as_ref() else {
        println!("no wager: `wager open ...`");
        return;
    };
    let mines = session.mines();
    let width = 5;
    for row in 0..session.squares().div_ceil(width) {
        let cells: Vec<String> = (row * width..((row + 1) * width).min(session.squares()))
            .map(|idx| {
                let mine = mines.and_then(|mines| mines.get(idx).copied()).unwrap_or(false);
                if session.is_revealed(idx) {
                    let mark = if mine { " X" } else { " *" };
                    mark.to_string()
                } else if mine {
                    " x".to_string()
                } else {
                    format!("{idx:>2}")
                }
            })
            .collect();
        println!("{}", cells.join(" "));
    }
    let payout = session.payout();
    println!(
        "bombs {}  found {}  cash out now: {} money, {} diamonds, {} emeralds, {} tiles",
        session.bombs,
        session.diamonds_found(),
        payout.money,
        payout.diamonds,
        payout.emeralds,
        payout.tiles
    );
}

fn drain_events(hub: &mut GameHub) {
    for event in hub.events.drain() {
        if let Some(line) = format_event(&event) {
            println!("event: {line}");
        }
    }
}

/// Events already echoed by the command output return `None`.
fn format_event(event: &Event) -> Option<String> {
    let line = match event {
        Event::CooldownStarted { seconds } => format!("cube emptied, recovering for {seconds}s"),
        Event::CubeHealed { health } => format!("cube healed to {health}"),
        Event::UpgradePurchased { shop, id, count, .. } => {
            format!("{} shop: {id} now at {count}", shop.id())
        }
        Event::HandLevelled { hand, level } => {
            format!("{} levelled to {level}", hand.display_name())
        }
        Event::RoundCompleted {
            round,
            score,
            reward,
            next_target,
        } => format!("round {round} cleared with {score} (+{reward} spades, next {next_target})"),
        Event::GameOver {
            score,
            rounds,
            reward,
        } => format!("game over at {score} after {rounds} rounds, {reward} spades pending"),
        Event::WagerCashedOut { money, diamonds, .. } => {
            format!("wager paid {money} money and {diamonds} diamonds")
        }
        Event::CurrencyChanged {
            currency,
            delta,
            balance,
        } => format!("{} {delta:+} -> {balance}", currency.id()),
        Event::CubeClicked { .. }
        | Event::HandDealt { .. }
        | Event::HandScored { .. }
        | Event::CardsDiscarded { .. }
        | Event::JokerBought { .. }
        | Event::RunRestarted { .. }
        | Event::WordScored { .. }
        | Event::TilesRerolled { .. }
        | Event::WagerOpened { .. }
        | Event::SquareRevealed { .. } => return None,
    };
    Some(line)
}
