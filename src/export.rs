use std::path::{Path, PathBuf};

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{
    Error, Res,
    types::{DateBucket, ReleaseItem},
};

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; margin: 20px; }
.grid { display: flex; flex-wrap: wrap; gap: 20px; }
.card { border: 1px solid #ccc; border-radius: 8px; padding: 10px; width: 200px; box-shadow: 2px 2px 12px rgba(0,0,0,0.1); text-align: center; }
.card img { width: 100%; height: auto; border-radius: 4px; }
.card h3 { font-size: 16px; margin: 10px 0 5px 0; }
.card p { font-size: 14px; margin: 5px 0; }
h2, h3 { color: #333; }
"#;

pub fn file_name(date: &str) -> String {
    format!("Spotify_Releases_{date}.html")
}

fn card(item: &ReleaseItem) -> Markup {
    html! {
        div class="card" {
            img src=(item.cover_url().unwrap_or_default()) alt=(item.name);
            h3 { (item.name) }
            p { "Artist: " (item.first_artist().unwrap_or("Unknown")) }
            p { "Release date: " (item.release_date) }
            @if let Some(url) = &item.external_urls.spotify {
                p { a href=(url) target="_blank" { "Open in Spotify" } }
            }
        }
    }
}

fn section(title: &str, items: &[ReleaseItem]) -> Markup {
    html! {
        h2 { (title) }
        @if items.is_empty() {
            p { "None." }
        } @else {
            div class="grid" {
                @for item in items {
                    (card(item))
                }
            }
        }
    }
}

/// Renders one day's releases as a standalone HTML document.
pub fn render_html(date: &str, bucket: &DateBucket) -> String {
    let title = format!("Spotify releases - {date}");
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { (title) }
                (section("Albums", &bucket.albums))
                (section("Singles", &bucket.singles))
            }
        }
    }
    .into_string()
}

/// Writes the HTML snapshot of `date` into `dir` and returns its path.
pub async fn write_html(dir: &Path, date: &str, bucket: &DateBucket) -> Res<PathBuf> {
    async_fs::create_dir_all(dir).await?;
    let path = dir.join(file_name(date));
    async_fs::write(&path, render_html(date, bucket))
        .await
        .map_err(|e| Error::Persistence(format!("cannot write {}: {}", path.display(), e)))?;
    Ok(path)
}
