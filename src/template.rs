//! The HTML document wrapped around a rendered status message.

use crate::favicon::icon_source;
use crate::motd::{escape_html, parse_tree};
use crate::status::StatusSnapshot;

/// Markup used when the status message renders to nothing.
const EMPTY_MOTD: &str = r#"<span class="mcformat mcformat-reset">No MOTD</span>"#;

/// Render the embed page for `snapshot`, titled `display_name`. Static
/// assets (stylesheet, background, fallback icon) are referenced below
/// `base_url`.
pub fn render_embed(display_name: &str, snapshot: &StatusSnapshot, base_url: &str) -> String {
    let markup = parse_tree(&snapshot.description);
    let icon_src = escape_html(&icon_source(snapshot.icon.as_deref(), base_url));
    render_document(&escape_html(display_name), &icon_src, &markup, base_url)
}

fn render_document(name: &str, icon_src: &str, markup: &str, base_url: &str) -> String {
    let motd = if markup.is_empty() { EMPTY_MOTD } else { markup };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{name} - MOTD</title>
    <link rel="stylesheet" href="{base_url}/motd-embed.css">
    <style>
        * {{ box-sizing: border-box; }}
        html, body {{ margin: 0; padding: 0; width: 100%; height: 100%; overflow: hidden; }}
        body {{
            display: block;
            background-image: url({base_url}/minecraft-background-dark-160x-K223BAAL.png);
            background-repeat: repeat;
            background-size: 80px;
            image-rendering: pixelated;
        }}
    </style>
</head>
<body>
    <div class="editor-container">
        <div class="editor-inner mcformat-background mcformat-motd">
            <div class="server-icon">
                <img width="64" height="64" src="{icon_src}" alt="Minecraft server icon" style="width: 64px; height: 64px; display: block;">
            </div>
            <div class="text">
                <div class="name">{name}</div>
                <div class="editor">
                    <div class="mcformat-editor">
                        <div class="mcformat-output mcformat-code-hidden">
                            <span class="mcformat-wrapper">{motd}</span>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    </div>
</body>
</html>"#
    )
}
