use camino::Utf8Path;
use herbarium_lib::config::{cache_paths, store_paths};
use herbarium_lib::core::launcher::LaunchOutcome;
use herbarium_lib::core::steam::SteamWorkshop;
use herbarium_lib::models::error::SError;
use herbarium_lib::utils::{icon, logging};
use herbarium_lib::{AppConfig, ModManager};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

const USAGE: &str = "\
Herbarium: mod manager for Steam Workshop games

Usage:
  herbarium list | ls               List known mods
  herbarium enable | e <id|ALL>     Enable a mod by folder, codename, or ALL
  herbarium disable | d <id|ALL>    Disable a mod by folder, codename, or ALL
  herbarium launch | start | l      Launch the game with the current mod setup
  herbarium cover <folder>          Print the cached cover path (downloads on miss)
  herbarium --help                  Show this text";

fn main() -> ExitCode {
    let store = match store_paths() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = logging::init(Some(&store.logs));

    match run(std::env::args().skip(1).collect()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<ExitCode, SError> {
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        println!("{USAGE}");
        return Ok(ExitCode::SUCCESS);
    };

    let manager = ModManager::new(AppConfig::load()?, store_paths()?, cache_paths()?, SteamWorkshop::new());

    match command.as_str() {
        "list" | "ls" => {
            let catalog = manager.scan_and_reconcile()?;
            print_mods(&catalog);
        }
        "enable" | "e" => {
            manager.toggle(&args.next().unwrap_or_default(), true)?;
        }
        "disable" | "d" => {
            manager.toggle(&args.next().unwrap_or_default(), false)?;
        }
        "launch" | "start" | "l" => {
            let report = manager.launch_with_mods(&mut confirm_cross_device)?;
            for failure in &report.relocation_failures {
                eprintln!("warning: {} stayed enabled: {}", failure.path, failure.error);
            }
            for failure in &report.restore.failures {
                eprintln!("restore error: {}: {}", failure.path, failure.error);
            }
            if report.outcome == LaunchOutcome::Interrupted {
                return Ok(ExitCode::FAILURE);
            }
        }
        "cover" => {
            let folder = args.next().ok_or(SError::InvalidSelector)?;
            let path = manager.cover(&folder)?;
            println!("{path}");
            if icon::load_cover_as_data_uri(&path).is_none() {
                eprintln!("warning: {path} is not a recognised image");
            }
        }
        "--help" | "-h" | "help" => println!("{USAGE}"),
        other => {
            eprintln!("unknown command: {other}\n\n{USAGE}");
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_mods(catalog: &herbarium_lib::models::library::Catalog) {
    let mods = catalog.sorted_for_display();
    let code_width = mods.iter().map(|m| m.codename.chars().count()).max().unwrap_or(0) + 4;

    println!("{:<9} {:<code_width$} {}", "Enabled", "CodeName", "Name");
    for m in mods {
        let mark = if m.enabled { "✅" } else { "❌" };
        println!("{:<8} {:<code_width$} {}", mark, m.codename, m.name);
    }
}

/// Interactive answer for the `ask` cross-device policy.
fn confirm_cross_device(src: &Utf8Path, dst: &Utf8Path, cause: &SError) -> bool {
    eprintln!("\x1b[31mERROR:\x1b[0m {cause}");
    eprintln!("The workshop folder and the disabled mods folder seem to be on different drives.");
    eprintln!("Moving {src} to {dst} needs a full copy.");
    eprintln!("Copying large folders across drives on every launch wears SSD/HDD storage.");
    eprintln!("Consider changing disabled_dir in the config, or confirm to continue.");
    eprint!("Continue? [Y/n]: ");
    let _ = io::stderr().flush();

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return false;
    }
    let answer = input.trim();
    answer.is_empty() || answer.eq_ignore_ascii_case("y")
}
