//! Signage Designer CLI: edit stored layouts with command scripts.
//!
//! ```text
//! sd --new "Lobby" --script welcome.sd        # create, run, save
//! sd 3f0c…e1 --script tweaks.sd               # load, run, save
//! sd 3f0c…e1                                  # print the layers panel
//! sd --list                                   # ids in the store
//! ```
//!
//! | Variable       | Default     | Description                     |
//! |----------------|-------------|---------------------------------|
//! | `SD_STORE_DIR` | `layouts`   | Directory holding layout files  |
//! | `SD_FORMAT`    | `json`      | `json` or `msgpack`             |
//! | `RUST_LOG`     | `warn`      | Log verbosity                   |

use anyhow::{Context, bail};
use clap::Parser;
use sd_core::LayoutId;
use sd_editor::{Designer, DesignerConfig, StatusLevel, StatusLog};
use sd_store::{Encoding, FileStore};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sd", about = "Headless signage layout designer", version)]
struct Cli {
    /// Layout to open.
    #[arg(conflicts_with_all = ["new", "list"])]
    layout: Option<String>,

    /// Start a new empty layout with this name instead of loading one.
    #[arg(long, value_name = "NAME")]
    new: Option<String>,

    /// Command script to run against the layout.
    #[arg(long, short, value_name = "PATH")]
    script: Option<PathBuf>,

    /// List stored layout ids and exit.
    #[arg(long)]
    list: bool,

    /// Run the script but do not write the result back.
    #[arg(long)]
    dry_run: bool,

    /// Directory holding layout files.
    #[arg(long, default_value = "layouts", env = "SD_STORE_DIR")]
    store_dir: PathBuf,

    /// Storage encoding: json or msgpack.
    #[arg(long, default_value = "json", env = "SD_FORMAT")]
    format: Encoding,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let storage = FileStore::new(&cli.store_dir, cli.format);

    if cli.list {
        let ids = storage
            .list_layouts()
            .await
            .with_context(|| format!("listing layouts in {}", cli.store_dir.display()))?;
        for id in ids {
            println!("{id}");
        }
        return Ok(());
    }

    let config = DesignerConfig::default();
    let status = StatusLog::new(config.status_capacity);
    let mut designer = Designer::new(config, status.clone());

    let created = match (&cli.new, &cli.layout) {
        (Some(name), _) => {
            designer.new_layout(name.clone());
            true
        }
        (None, Some(id)) => {
            if !designer.load(&storage, &LayoutId::from(id.as_str())).await {
                print_status(&status);
                bail!("could not open layout {id}");
            }
            false
        }
        (None, None) => bail!("nothing to do: pass a layout id, --new NAME or --list"),
    };

    if let Some(path) = &cli.script {
        let script = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading script {}", path.display()))?;
        let changed = designer
            .run_script(&script)
            .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;
        log::info!("{changed} command(s) changed the layout");
    }

    if (created || designer.is_dirty()) && !cli.dry_run && !designer.save(&storage).await {
        print_status(&status);
        bail!("layout was not saved");
    }

    print_status(&status);
    print_summary(&designer);
    Ok(())
}

fn print_status(status: &StatusLog) {
    for entry in status.entries() {
        let tag = match entry.level {
            StatusLevel::Info => "info",
            StatusLevel::Warning => "warning",
            StatusLevel::Error => "error",
        };
        eprintln!("{tag}: {}", entry.message);
    }
    status.clear();
}

fn print_summary(designer: &Designer) {
    let header = designer.header();
    println!("{} ({})", header.name, header.id);
    println!(
        "  {}x{} {}, background {}",
        header.resolution.width,
        header.resolution.height,
        header.resolution.orientation.as_str(),
        header.background_color
    );
    let store = designer.store();
    for (row, element) in store.layer_elements().into_iter().enumerate() {
        let mut flags = String::new();
        if !element.visible {
            flags.push_str(" hidden");
        }
        if element.locked {
            flags.push_str(" locked");
        }
        println!(
            "  {row:>3}  z={:<4} {:<10} {:<24} {}{flags}",
            element.z_index,
            element.kind().as_str(),
            element.name,
            element.id
        );
    }
}
