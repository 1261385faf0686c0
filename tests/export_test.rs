use spordcli::export::{file_name, render_html, write_html};
use spordcli::types::{AlbumArtist, DateBucket, ExternalUrls, Image, ReleaseItem};

fn release(id: &str, name: &str, album_type: &str, link: bool) -> ReleaseItem {
    ReleaseItem {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![AlbumArtist {
            id: "artist".to_string(),
            name: "Sigur Rós".to_string(),
        }],
        images: vec![Image {
            url: format!("https://i.scdn.co/image/{id}"),
            height: None,
            width: None,
        }],
        release_date: "2025-01-10".to_string(),
        release_date_precision: "day".to_string(),
        album_type: album_type.to_string(),
        external_urls: ExternalUrls {
            spotify: link.then(|| format!("https://open.spotify.com/album/{id}")),
        },
        genres: None,
    }
}

#[test]
fn test_file_name() {
    assert_eq!(file_name("2025-01-10"), "Spotify_Releases_2025-01-10.html");
}

#[test]
fn test_render_html_lists_albums_and_singles() {
    let bucket = DateBucket {
        albums: vec![release("a1", "Ágætis byrjun", "album", true)],
        singles: vec![release("s1", "Hoppípolla", "single", false)],
    };

    let html = render_html("2025-01-10", &bucket);

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Spotify releases - 2025-01-10"));
    assert!(html.contains("Ágætis byrjun"));
    assert!(html.contains("Hoppípolla"));
    assert!(html.contains("Sigur Rós"));
    assert!(html.contains("https://i.scdn.co/image/a1"));
    assert!(html.contains("https://open.spotify.com/album/a1"));
    assert!(!html.contains("https://open.spotify.com/album/s1"));

    let albums = html.find("Albums").unwrap();
    let singles = html.find("Singles").unwrap();
    let album_pos = html.find("Ágætis byrjun").unwrap();
    let single_pos = html.find("Hoppípolla").unwrap();
    assert!(albums < album_pos && album_pos < singles && singles < single_pos);
}

#[test]
fn test_render_html_escapes_release_text() {
    let bucket = DateBucket {
        albums: vec![release("x", "<script>alert(1)</script>", "album", false)],
        singles: vec![],
    };

    let html = render_html("2025-01-10", &bucket);

    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn test_write_html() {
    let dir = tempfile::tempdir().unwrap();
    let bucket = DateBucket {
        albums: vec![],
        singles: vec![release("s1", "Single", "single", true)],
    };

    let path = write_html(dir.path(), "2025-01-10", &bucket).await.unwrap();

    assert_eq!(path, dir.path().join("Spotify_Releases_2025-01-10.html"));
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.contains("Single"));
}
