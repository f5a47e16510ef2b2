use anyhow::Result;
use intelli_foods::config::AppConfig;
use intelli_foods::errors::{error_logging, AppError};
use intelli_foods::inventory::{FoodItem, StorageLocation};
use intelli_foods::kitchen::{Kitchen, RecipeDisplay, NO_RECIPE_MESSAGE};
use intelli_foods::observability;
use intelli_foods::orchestrator::GenerationOutcome;
use intelli_foods::KitchenApiClient;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

type ConsoleKitchen = Kitchen<KitchenApiClient>;

const HELP: &str = "\
Commands:
  open <shelf|fridge|freezer>   open a storage location
  close                         close the open storage location
  add <name>                    add food to the open location
  edit <index> <name>           rename the item at index
  delete <index>                remove the item at index
  type <text>                   search ingredients for the main ingredient
  select <name>                 choose a suggested ingredient
  substitute                    toggle substitution suggestions
  generate                      request a recipe
  show                          print the recipe panel
  logout                        sign out
  quit                          exit";

/// Load and validate configuration at startup
fn load_configuration() -> Result<AppConfig> {
    let config = AppConfig::from_env().map_err(|e| {
        error_logging::log_config_error(&e, "environment", "load_configuration");
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    config.validate().map_err(|e| {
        anyhow::anyhow!("Configuration validation failed: {}. Please check your environment variables.", e)
    })?;

    Ok(config)
}

fn print_items(kitchen: &ConsoleKitchen) {
    let Some(location) = kitchen.active_storage() else {
        return;
    };
    let items = kitchen.working_copy();
    println!("{} ({} items)", location.title(), items.len());
    for (index, item) in items.iter().enumerate() {
        println!("  [{}] {}", index, item.name);
    }
}

fn print_display(kitchen: &ConsoleKitchen) {
    match kitchen.display() {
        RecipeDisplay::Loading => println!("Generating recipe..."),
        RecipeDisplay::Placeholder => println!("{}", NO_RECIPE_MESSAGE),
        RecipeDisplay::Recipe(recipe) => {
            println!("{}", recipe.title);
            println!("Image: {}", recipe.image_url);
            println!("Ingredients:");
            for ingredient in &recipe.ingredients {
                println!("  - {}", ingredient);
            }
            println!("Steps:");
            for (number, step) in recipe.steps.iter().enumerate() {
                println!("  {}. {}", number + 1, step);
            }
        }
    }
}

fn report(result: Result<(), AppError>) {
    match result {
        Ok(()) => {}
        Err(AppError::AuthRequired) => println!("Please sign in first."),
        Err(e) => println!("{}", e),
    }
}

fn parse_index(arg: &str) -> Result<usize, AppError> {
    arg.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("'{}' is not a valid index", arg.trim())))
}

/// Run one console command; returns false when the console should exit
async fn handle_command(kitchen: &Arc<ConsoleKitchen>, line: &str) -> bool {
    let line = line.trim();
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" => {}
        "help" => println!("{}", HELP),
        "quit" | "exit" => return false,
        "open" => match rest.parse::<StorageLocation>() {
            Ok(location) => {
                kitchen.open_storage(location);
                print_items(kitchen);
            }
            Err(e) => println!("{}", e),
        },
        "close" => kitchen.close_storage(),
        "add" => {
            report(kitchen.add_food(FoodItem::new(rest)).await);
            print_items(kitchen);
        }
        "edit" => {
            let (index, name) = rest.split_once(' ').unwrap_or((rest, ""));
            let result = match parse_index(index) {
                Ok(index) => kitchen.edit_food(index, FoodItem::new(name)).await,
                Err(e) => Err(e),
            };
            report(result);
            print_items(kitchen);
        }
        "delete" => {
            let result = match parse_index(rest) {
                Ok(index) => kitchen.delete_food(index).await,
                Err(e) => Err(e),
            };
            report(result);
            print_items(kitchen);
        }
        "type" => {
            let candidates = kitchen.set_input(rest);
            if kitchen.is_dropdown_open() {
                for candidate in candidates {
                    println!("  {} ({})", candidate.name, candidate.availability_label());
                }
            }
        }
        "select" => {
            report(kitchen.select_ingredient(rest));
            let pantry = kitchen.pantry_context();
            if !pantry.is_empty() {
                println!(
                    "Using pantry: {}",
                    pantry.into_iter().collect::<Vec<_>>().join(", ")
                );
            }
        }
        "substitute" => {
            let enabled = kitchen.toggle_suggest_substitution();
            println!("Suggest substitution: {}", if enabled { "on" } else { "off" });
        }
        "generate" => {
            // Runs in the background so a newer request can supersede it
            let kitchen = Arc::clone(kitchen);
            tokio::spawn(async move {
                match kitchen.generate_recipe().await {
                    Ok(GenerationOutcome::Completed(_)) => print_display(&kitchen),
                    Ok(GenerationOutcome::Failed(e)) => {
                        println!("Recipe generation failed: {}", e);
                        print_display(&kitchen);
                    }
                    Ok(GenerationOutcome::Superseded) => {}
                    Err(e) => report(Err(e)),
                }
            });
        }
        "show" => print_display(kitchen),
        "logout" => match kitchen.log_out().await {
            Ok(()) => println!("Signed out."),
            Err(e) => report(Err(e)),
        },
        other => println!("Unknown command '{}'. Type 'help' for a list.", other),
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = load_configuration()?;

    // Initialize logging and optional metrics export
    observability::init_observability_with_config(config.observability.clone())?;
    info!("{}", config.summary());

    let client = KitchenApiClient::new(&config.api)?;
    let kitchen = Arc::new(Kitchen::new(Arc::new(client)));

    if let Err(e) = kitchen.start().await {
        warn!(error = %e, "Starting with an empty kitchen");
    }
    info!(
        logged_in = kitchen.session().is_logged_in(),
        items = kitchen.store().snapshot().item_count(),
        "Kitchen ready"
    );
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !handle_command(&kitchen, &line).await {
            break;
        }
    }

    info!("Console closed");
    Ok(())
}
