use quarkboard_core::MountEntry;
use quarkboard_core::config::AppConfig;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct MountRow {
    #[tabled(rename = "Prefix")]
    prefix: String,
    #[tabled(rename = "Plugin")]
    plugin: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Directory")]
    directory: String,
}

impl From<&MountEntry> for MountRow {
    fn from(entry: &MountEntry) -> Self {
        Self {
            prefix: entry.url_prefix.clone(),
            plugin: entry.plugin.clone(),
            category: entry.category.to_string(),
            directory: entry.directory.display().to_string(),
        }
    }
}

pub fn run(config: AppConfig, resolve: Option<String>) -> anyhow::Result<()> {
    let boot = quarkboard_runtime::boot(config)?;
    let mounts = &boot.mounts;

    if let Some(path) = resolve {
        match mounts.resolve(&path) {
            Some((entry, relative)) => println!(
                "{} -> {} (plugin '{}')",
                path,
                entry.directory.join(relative).display(),
                entry.plugin
            ),
            None => println!("{} is not served by any mount", path),
        }
        return Ok(());
    }

    if mounts.is_empty() {
        println!("No asset mounts.");
    } else {
        let rows: Vec<MountRow> = mounts.entries().map(MountRow::from).collect();
        println!("{}", Table::new(rows));
    }

    if !mounts.shadowed().is_empty() {
        println!("\nShadowed by a later plugin of the same name:");
        let rows: Vec<MountRow> = mounts.shadowed().iter().map(MountRow::from).collect();
        println!("{}", Table::new(rows));
    }
    Ok(())
}
