//! Pet Haven - Entry Point
//!
//! Text front end over the simulation core. Each command is one player
//! action; `tick` stands in for frame time passing.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pet_haven::core::clock::SystemTimeSource;
use pet_haven::core::config::GameConfig;
use pet_haven::core::error::Result;
use pet_haven::core::types::TargetId;
use pet_haven::economy::Stock;
use pet_haven::events::Notification;
use pet_haven::items::catalog::ItemCatalog;
use pet_haven::persistence::store::{PrefsStore, SharedStore};
use pet_haven::pet::needs::NeedType;
use pet_haven::PetGame;

#[derive(Parser, Debug)]
#[command(name = "pet-haven")]
#[command(about = "Look after a virtual pet from the terminal")]
struct Args {
    /// Save file (JSON key-value store)
    #[arg(long, default_value = "pet_haven_save.json")]
    save: PathBuf,

    /// Game tuning overrides (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Item catalog (TOML); built-in items when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Random seed for the mini-game
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pet_haven=info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let catalog = match &args.catalog {
        Some(path) => ItemCatalog::load(path)?,
        None => ItemCatalog::with_defaults(),
    };
    let store = SharedStore::new(PrefsStore::open(&args.save)?);
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut game = PetGame::new(config, catalog, store, Box::new(SystemTimeSource), seed)?;
    game.subscribe(print_notification);
    game.start_session();

    println!("\n=== PET HAVEN ===");
    println!();
    println!("Commands:");
    println!("  tick [secs] / t  - Let time pass (default 1s)");
    println!("  status / s       - Show the pet's needs");
    println!("  inv / i          - Show the inventory");
    println!("  shop             - List shop offers");
    println!("  buy <offer> [n]  - Buy n of an offer");
    println!("  use <slot>       - Use the item in a slot");
    println!("  play             - Start the garden mini-game");
    println!("  click <id>       - Click a mini-game target");
    println!("  restock          - Restock the shop");
    println!("  quit / q         - Save and exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let mut words = input.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let arg1 = words.next();
        let arg2 = words.next();

        match command {
            "quit" | "q" => break,
            "tick" | "t" => {
                let secs = arg1.and_then(|s| s.parse::<f32>().ok()).unwrap_or(1.0);
                game.tick(secs);
                if game.minigame().is_running() {
                    display_minigame(&game);
                }
            }
            "status" | "s" => display_status(&game),
            "inv" | "i" => display_inventory(&game),
            "shop" => display_shop(&game),
            "buy" => match arg1.and_then(|s| s.parse::<usize>().ok()) {
                Some(offer) => {
                    let quantity = arg2.and_then(|s| s.parse::<u32>().ok()).unwrap_or(1);
                    let _ = game.purchase(offer, quantity);
                }
                None => println!("Usage: buy <offer> [n]"),
            },
            "use" => match arg1.and_then(|s| s.parse::<usize>().ok()) {
                Some(slot) if game.use_item(slot) => display_status(&game),
                Some(slot) => println!("Nothing usable in slot {}", slot),
                None => println!("Usage: use <slot>"),
            },
            "play" => {
                game.start_minigame();
                display_minigame(&game);
            }
            "click" => match arg1.and_then(|s| s.parse::<u32>().ok()) {
                Some(id) => match game.click_target(TargetId(id)) {
                    Some(points) => println!("+{} points (score {})", points, game.minigame().score()),
                    None => println!("Missed"),
                },
                None => println!("Usage: click <id>"),
            },
            "restock" => {
                game.restock_shop();
                println!("Shop restocked");
            }
            other => println!("Unknown command: {}", other),
        }
    }

    game.end_session()?;
    println!("Goodbye!");
    Ok(())
}

fn print_notification(notification: &Notification) {
    match notification {
        Notification::NeedCritical(need) => println!("! {} is critically low", need.label()),
        Notification::NeedRecovered(need) => println!("  {} is okay again", need.label()),
        Notification::PurchaseResult { message, .. } => println!("{}", message),
        Notification::MiniGameEnded { score, reward, new_best } => {
            println!("Game over! Score: {} Reward: {}", score, reward);
            if *new_best {
                println!("New best score!");
            }
        }
    }
}

fn display_status(game: &PetGame) {
    let needs = game.needs();
    for need in NeedType::ALL {
        println!("  {:<12} {:>5.1}", need.label(), needs.get(need));
    }
    println!("  {:<12} {}", game.wallet().currency_label(), game.balance());
}

fn display_inventory(game: &PetGame) {
    let mut any = false;
    for (index, slot) in game.inventory().slots().iter().enumerate() {
        if let Some(item) = slot.item() {
            any = true;
            println!("  [{}] {} x{}  {}", index, item.name, slot.quantity(), item.effect_summary());
        }
    }
    if !any {
        println!("  (empty)");
    }
}

fn display_shop(game: &PetGame) {
    println!("--- {} ---", game.shop().name());
    for (index, offer) in game.shop().offers().iter().enumerate() {
        let stock = match offer.stock {
            Stock::Unlimited => String::from("-"),
            Stock::Limited(n) => n.to_string(),
        };
        let status = if offer.available { "" } else { " (sold out)" };
        println!(
            "  [{}] {:<14} {:>4} {}  stock {}{}",
            index,
            offer.item.name,
            offer.price,
            game.wallet().currency_label(),
            stock,
            status
        );
    }
}

fn display_minigame(game: &PetGame) {
    let session = game.minigame();
    println!("Time {:.1}s  Score {}", session.time_remaining(), session.score());
    for target in session.targets() {
        println!(
            "  target {} at ({:.0}, {:.0}) {:.1}s left",
            target.id.0,
            target.position.x,
            target.position.y,
            target.time_left()
        );
    }
}
