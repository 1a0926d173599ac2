use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;

use vitrine_gallery::{parse_tags, AlbumDraft, Gallery, PendingUpload};
use vitrine_state::{Album, FsSlot, ViewMode};
use vitrine_types::{AlbumId, MediaId, MediaKind};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let root = PathBuf::from(&cli.root);
    let slot = Arc::new(FsSlot::new(root.join("state.json")));
    let mut gallery = Gallery::open(slot, root.join("blobs")).await;

    match cli.command {
        Command::Signup(args) => cmd_signup(&mut gallery, args),
        Command::Login(args) => cmd_login(&mut gallery, args),
        Command::QuickLogin(args) => cmd_quick_login(&mut gallery, args),
        Command::Logout => cmd_logout(&mut gallery),
        Command::Whoami => cmd_whoami(&gallery),
        Command::Album(args) => match args.action {
            AlbumAction::Create(args) => cmd_album_create(&mut gallery, args).await,
            AlbumAction::List(args) => cmd_album_list(&gallery, args),
            AlbumAction::Show(args) => cmd_album_show(&mut gallery, args),
            AlbumAction::Edit(args) => cmd_album_edit(&mut gallery, args),
            AlbumAction::Delete(args) => cmd_album_delete(&mut gallery, args).await,
        },
        Command::Like(args) => cmd_like(&mut gallery, args),
        Command::Export(args) => cmd_export(&gallery, args).await,
        Command::Stats => cmd_stats(&gallery),
        Command::Migrate => cmd_migrate(&mut gallery).await,
        Command::View(args) => cmd_view(&mut gallery, args),
    }
}

fn cmd_signup(gallery: &mut Gallery, args: SignupArgs) -> anyhow::Result<()> {
    let user = gallery.sign_up(&args.email, &args.password)?;
    println!("{} Signed up as {} <{}>", "✓".green().bold(), user.name.bold(), user.email);
    Ok(())
}

fn cmd_login(gallery: &mut Gallery, args: LoginArgs) -> anyhow::Result<()> {
    let user = gallery.log_in(&args.email, &args.password)?;
    println!("{} Signed in as {} <{}>", "✓".green().bold(), user.name.bold(), user.email);
    Ok(())
}

fn cmd_quick_login(gallery: &mut Gallery, args: QuickLoginArgs) -> anyhow::Result<()> {
    let user = gallery.quick_login(&args.provider);
    println!("{} Signed in as {} via {}", "✓".green().bold(), user.name.bold(), user.provider.cyan());
    Ok(())
}

fn cmd_logout(gallery: &mut Gallery) -> anyhow::Result<()> {
    gallery.log_out();
    println!("Signed out.");
    Ok(())
}

fn cmd_whoami(gallery: &Gallery) -> anyhow::Result<()> {
    match gallery.current_user() {
        Some(user) => println!("{} <{}> via {}", user.name.bold(), user.email, user.provider.cyan()),
        None => println!("Not signed in."),
    }
    Ok(())
}

async fn cmd_album_create(gallery: &mut Gallery, args: AlbumCreateArgs) -> anyhow::Result<()> {
    let mut uploads = Vec::with_capacity(args.media.len());
    for path in &args.media {
        let path = Path::new(path);
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string());
        uploads.push(PendingUpload {
            kind: kind_for_path(path),
            name,
            bytes,
        });
    }

    let draft = AlbumDraft {
        name: args.name,
        tags: args.tags.as_deref().map(parse_tags).unwrap_or_default(),
        description: args.description.unwrap_or_default(),
        uploads,
    };
    let upload_count = draft.uploads.len();
    let id = gallery.create_album(draft).await?;
    println!("{} Created album {}", "✓".green().bold(), id.as_str().yellow());
    if upload_count > 0 {
        println!("  {} media item(s) stored", upload_count.to_string().bold());
    }
    Ok(())
}

fn cmd_album_list(gallery: &Gallery, args: AlbumListArgs) -> anyhow::Result<()> {
    let albums = gallery.search_albums(args.query.as_deref().unwrap_or(""));
    if albums.is_empty() {
        println!("No albums.");
        return Ok(());
    }
    for album in albums {
        println!(
            "{}  {}  {} item(s), {} view(s)",
            album.id.as_str().yellow(),
            album.name.bold(),
            album.media.len(),
            album.views,
        );
        if !album.tags.is_empty() {
            println!("  tags: {}", album.tags.join(", ").cyan());
        }
    }
    Ok(())
}

fn cmd_album_show(gallery: &mut Gallery, args: AlbumShowArgs) -> anyhow::Result<()> {
    let album = gallery.open_album(&AlbumId::from_string(args.id))?;
    print_album(album);
    Ok(())
}

fn print_album(album: &Album) {
    println!("{}  {}", album.id.as_str().yellow().bold(), album.name.bold());
    println!("  created: {}", album.created_at.to_rfc3339());
    println!("  views: {}", album.views);
    if !album.description.is_empty() {
        println!("  {}", album.description);
    }
    if !album.tags.is_empty() {
        println!("  tags: {}", album.tags.join(", ").cyan());
    }
    for entry in &album.media {
        let liked = if entry.liked { "♥".red().to_string() } else { " ".to_string() };
        println!("  {} {}  {}  [{}]", liked, entry.id.as_str().dimmed(), entry.name, entry.kind.as_str());
    }
}

fn cmd_album_edit(gallery: &mut Gallery, args: AlbumEditArgs) -> anyhow::Result<()> {
    let id = AlbumId::from_string(args.id);
    let current = gallery
        .album(&id)
        .map(|a| (a.name.clone(), a.description.clone(), a.tags.clone()));
    let Some((name, description, tags)) = current else {
        anyhow::bail!("album not found: {id}");
    };

    gallery.edit_album(
        &id,
        args.name.as_deref().unwrap_or(&name),
        args.description.as_deref().unwrap_or(&description),
        args.tags.as_deref().map(parse_tags).unwrap_or(tags),
    )?;
    println!("{} Updated album {}", "✓".green().bold(), id.as_str().yellow());
    Ok(())
}

async fn cmd_album_delete(gallery: &mut Gallery, args: AlbumDeleteArgs) -> anyhow::Result<()> {
    let album = gallery.delete_album(&AlbumId::from_string(args.id)).await?;
    println!(
        "{} Deleted album {} ({} media item(s))",
        "✓".green().bold(),
        album.name.bold(),
        album.media.len(),
    );
    Ok(())
}

fn cmd_like(gallery: &mut Gallery, args: LikeArgs) -> anyhow::Result<()> {
    let liked = gallery.toggle_like(
        &AlbumId::from_string(args.album_id),
        &MediaId::from_string(args.media_id),
    )?;
    if liked {
        println!("{} Liked", "♥".red());
    } else {
        println!("Unliked");
    }
    Ok(())
}

async fn cmd_export(gallery: &Gallery, args: ExportArgs) -> anyhow::Result<()> {
    let id = MediaId::from_string(args.media_id);
    let handle = gallery
        .resolve_media(&id)
        .await
        .with_context(|| format!("media not found: {id}"))?;
    let out = args.out.unwrap_or_else(|| handle.name.clone());
    std::fs::write(&out, &handle.data).with_context(|| format!("writing {out}"))?;
    // The handle was only needed for this export.
    gallery.release_media(&id);
    println!("{} Exported {} ({} bytes)", "✓".green().bold(), out.bold(), handle.size());
    Ok(())
}

fn cmd_stats(gallery: &Gallery) -> anyhow::Result<()> {
    let stats = gallery.stats();
    println!("Albums:      {}", stats.albums.to_string().bold());
    println!("Media items: {}", stats.media_items.to_string().bold());
    println!("Total views: {}", stats.total_views.to_string().bold());
    Ok(())
}

async fn cmd_migrate(gallery: &mut Gallery) -> anyhow::Result<()> {
    let report = gallery.run_legacy_migration().await;
    if report.changed() {
        println!(
            "{} Migrated {} item(s), skipped {} malformed",
            "✓".green().bold(),
            report.migrated.to_string().bold(),
            report.skipped,
        );
    } else {
        println!("Nothing to migrate.");
    }
    Ok(())
}

fn cmd_view(gallery: &mut Gallery, args: ViewArgs) -> anyhow::Result<()> {
    let mode = if args.mode == "list" { ViewMode::List } else { ViewMode::Grid };
    gallery.set_view(mode);
    println!("View set to {:?}.", mode);
    Ok(())
}

/// Media kind from a file extension. Anything unrecognized counts as an
/// image, matching how unknown kinds normalize everywhere else.
fn kind_for_path(path: &Path) -> MediaKind {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => match ext.to_ascii_lowercase().as_str() {
            "mp4" | "webm" | "mov" | "mkv" | "avi" => MediaKind::Video,
            _ => MediaKind::Image,
        },
        None => MediaKind::Image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_for_common_extensions() {
        assert_eq!(kind_for_path(Path::new("clip.MP4")), MediaKind::Video);
        assert_eq!(kind_for_path(Path::new("clip.webm")), MediaKind::Video);
        assert_eq!(kind_for_path(Path::new("photo.jpg")), MediaKind::Image);
        assert_eq!(kind_for_path(Path::new("noext")), MediaKind::Image);
    }
}
