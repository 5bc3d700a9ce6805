//! Command execution.

use std::path::Path;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use teldrive_driver::{FileStream, Object, Storage, TelDrive};
use teldrive_driver::object::{base_name, parent_path};
use tokio_util::sync::CancellationToken;

use crate::cli::Commands;

pub async fn run(drive: &TelDrive, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Ls { path } => {
            let dir = folder(drive, &path).await?;
            for obj in drive.list(&dir).await? {
                println!("{}", format_entry(&obj));
            }
        }
        Commands::Mkdir { path } => {
            let parent = folder(drive, parent_path(&path)).await?;
            let dir = drive.make_dir(&parent, base_name(&path)).await?;
            println!("{}", dir.path);
        }
        Commands::Rm { path } => {
            let obj = drive.stat(&path).await?;
            drive.remove(&obj).await?;
        }
        Commands::Rename { path, new_name } => {
            let obj = drive.stat(&path).await?;
            let renamed = drive.rename(&obj, &new_name).await?;
            println!("{}", renamed.path);
        }
        Commands::Mv { path, dest_dir } => {
            let obj = drive.stat(&path).await?;
            let dst = folder(drive, &dest_dir).await?;
            let moved = drive.move_to(&obj, &dst).await?;
            println!("{}", moved.path);
        }
        Commands::Link { path } => {
            let obj = drive.stat(&path).await?;
            let link = drive.link(&obj).await?;
            println!("{}", link.url);
        }
        Commands::Put {
            src,
            dest_dir,
            name,
        } => put(drive, &src, &dest_dir, name).await?,
    }
    Ok(())
}

async fn put(
    drive: &TelDrive,
    src: &Path,
    dest_dir: &str,
    name: Option<String>,
) -> anyhow::Result<()> {
    let name = match name {
        Some(n) => n,
        None => src
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .with_context(|| format!("cannot derive a name from {}", src.display()))?,
    };

    let file = tokio::fs::File::open(src)
        .await
        .with_context(|| format!("opening {}", src.display()))?;
    let meta = file.metadata().await?;
    if !meta.is_file() {
        bail!("{} is not a regular file", src.display());
    }

    let mut stream = FileStream::new(name, Some(meta.len()), file);
    if let Ok(modified) = meta.modified() {
        stream = stream.with_mod_time(DateTime::<Utc>::from(modified));
    }

    let dst = folder(drive, dest_dir).await?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, stopping upload");
            on_signal.cancel();
        }
    });

    let progress = |fraction: f64| {
        tracing::info!(percent = %format!("{:.1}", fraction * 100.0), "upload progress");
    };
    let obj = drive.put(&dst, stream, &progress, &cancel).await?;
    println!("{}", obj.path);
    Ok(())
}

/// Resolves `path` and checks it is a folder.
async fn folder(drive: &TelDrive, path: &str) -> anyhow::Result<Object> {
    let obj = drive.stat(path).await?;
    if !obj.is_folder {
        bail!("{path} is not a folder");
    }
    Ok(obj)
}

fn format_entry(obj: &Object) -> String {
    let modified = obj
        .modified
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".repeat(16));
    let kind = if obj.is_folder { 'd' } else { '-' };
    format!("{kind} {:>12} {modified} {}", obj.size, obj.name)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn entry_formatting() {
        let mut obj = Object::root();
        obj.name = "sub".into();
        assert_eq!(
            format_entry(&obj),
            "d            0 ---------------- sub"
        );

        obj.is_folder = false;
        obj.size = 1024;
        obj.name = "a.txt".into();
        obj.modified = Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap());
        assert_eq!(
            format_entry(&obj),
            "-         1024 2024-06-01 12:30 a.txt"
        );
    }
}
