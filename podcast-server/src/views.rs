//! HTML views
//!
//! Pages are rendered with `format!` into a shared layout. Every value that
//! comes from a submission goes through `escape_html`.

use podcast_common::{Episode, EpisodeMedia, StorageVariant};
use std::fmt::Write;

use crate::forms::{
    FIELD_DESCRIPTION, FIELD_NAME, FIELD_PASSWORD, FIELD_TOPIC, FIELD_USER, FILE_AUDIO,
    FILE_DOCUMENT, FILE_IMAGE, FILE_PDF,
};

const STYLE: &str = r#"
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 800px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 {
            color: #333;
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }
        .episode {
            border: 1px solid #ddd;
            border-radius: 4px;
            padding: 10px 20px;
            margin: 15px 0;
        }
        .topic {
            color: #0066cc;
            font-weight: bold;
        }
        form label {
            display: block;
            margin-top: 10px;
        }
        .button {
            display: inline-block;
            padding: 10px 20px;
            background: #0066cc;
            color: white;
            border: none;
            border-radius: 4px;
            margin-top: 15px;
            text-decoration: none;
        }
"#;

/// Escape text for use in HTML content and attribute values
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        style = STYLE,
        body = body,
    )
}

fn episode_media(episode: &Episode) -> String {
    match &episode.media {
        EpisodeMedia::Files(paths) => {
            let mut html = String::new();
            if let Some(image) = &paths.image {
                let _ = write!(
                    html,
                    r#"<img src="{}" alt="{}" width="200">"#,
                    escape_html(image),
                    escape_html(&episode.name)
                );
            }
            if let Some(audio) = &paths.audio {
                let _ = write!(
                    html,
                    r#"<p><audio controls src="{}"></audio></p>"#,
                    escape_html(audio)
                );
            }
            if let Some(pdf) = &paths.pdf {
                let _ = write!(
                    html,
                    r#"<p><a href="{}">PDF</a></p>"#,
                    escape_html(pdf)
                );
            }
            html
        }
        EpisodeMedia::Document(bytes) => format!(
            r#"<p><a href="/episodes/{}/document">Document</a> ({} bytes)</p>"#,
            episode.id,
            bytes.len()
        ),
    }
}

/// GET / - every stored episode
pub fn index_page(episodes: &[Episode]) -> String {
    let mut body = String::from("    <h1>Podcasts</h1>\n");

    if episodes.is_empty() {
        body.push_str("    <p>No episodes yet.</p>\n");
    }

    for episode in episodes {
        let _ = write!(
            body,
            r#"    <div class="episode">
        <h2>{name}</h2>
        <p class="topic">{topic}</p>
        <p>{description}</p>
        {media}
    </div>
"#,
            name = escape_html(&episode.name),
            topic = escape_html(&episode.topic),
            description = escape_html(&episode.description),
            media = episode_media(episode),
        );
    }

    body.push_str(r#"    <p><a href="/private">Administration</a></p>"#);

    layout("Podcasts", &body)
}

/// GET /private - administrator login form
pub fn private_page() -> String {
    let body = format!(
        r#"    <h1>Administration</h1>
    <form action="/login" method="post">
        <label>User <input type="text" name="{user}" required></label>
        <label>Password <input type="password" name="{password}" required></label>
        <button type="submit" class="button">Sign in</button>
    </form>
    <p><a href="/">Back to the listing</a></p>"#,
        user = FIELD_USER,
        password = FIELD_PASSWORD,
    );

    layout("Administration", &body)
}

/// Page shown after a successful login: the episode upload form
pub fn special_page(variant: StorageVariant) -> String {
    let file_inputs = match variant {
        StorageVariant::Disk => format!(
            r#"        <label>PDF <input type="file" name="{pdf}" required></label>
        <label>Image <input type="file" name="{image}" accept="image/*" required></label>
        <label>Audio <input type="file" name="{audio}" accept="audio/*" required></label>"#,
            pdf = FILE_PDF,
            image = FILE_IMAGE,
            audio = FILE_AUDIO,
        ),
        StorageVariant::Inline => format!(
            r#"        <label>Document <input type="file" name="{document}" required></label>"#,
            document = FILE_DOCUMENT,
        ),
    };

    let body = format!(
        r#"    <h1>New episode</h1>
    <form action="/episodes" method="post" enctype="multipart/form-data">
        <label>Name <input type="text" name="{name}" required></label>
        <label>Topic <input type="text" name="{topic}" required></label>
        <label>Description <textarea name="{description}" required></textarea></label>
{file_inputs}
        <button type="submit" class="button">Publish</button>
    </form>
    <p><a href="/">Back to the listing</a></p>"#,
        name = FIELD_NAME,
        topic = FIELD_TOPIC,
        description = FIELD_DESCRIPTION,
        file_inputs = file_inputs,
    );

    layout("New episode", &body)
}

/// Routing miss
pub fn not_found_page() -> String {
    layout(
        "Page 404",
        r#"    <h1>Page 404</h1>
    <p>The page you are looking for does not exist.</p>
    <p><a href="/">Back to the listing</a></p>"#,
    )
}
