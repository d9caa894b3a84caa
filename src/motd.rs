//! Minecraft formatting-code parser.
//!
//! A status message embeds two-character markers (`§` followed by a code) that
//! switch the color or style of the text after them. [`parse`] turns such a
//! message into a flat run of `<span>` elements carrying `mcformat-*` CSS
//! classes. Markers stay visible in the output as `mcformat-code` spans so
//! that a stylesheet can choose to reveal them.
//!
//! State rules:
//! - `§r` clears color and styles.
//! - A color code replaces the active color; styles are kept.
//! - A style code adds its style; repeating it changes nothing.
//! - `§` followed by anything else is plain text.

use serde_json::Value;

/// The character that introduces a formatting code.
pub const MARKER: char = '§';

/// Class list used for text with no active color or style.
const RESET_CLASSES: &str = "mcformat mcformat-reset";

/// The sixteen chat colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl Color {
    fn from_code(code: char) -> Option<Color> {
        let color = match code {
            '0' => Color::Black,
            '1' => Color::DarkBlue,
            '2' => Color::DarkGreen,
            '3' => Color::DarkAqua,
            '4' => Color::DarkRed,
            '5' => Color::DarkPurple,
            '6' => Color::Gold,
            '7' => Color::Gray,
            '8' => Color::DarkGray,
            '9' => Color::Blue,
            'a' => Color::Green,
            'b' => Color::Aqua,
            'c' => Color::Red,
            'd' => Color::LightPurple,
            'e' => Color::Yellow,
            'f' => Color::White,
            _ => return None,
        };
        Some(color)
    }

    /// CSS class for this color.
    pub fn class(self) -> &'static str {
        match self {
            Color::Black => "mcformat-black",
            Color::DarkBlue => "mcformat-dark-blue",
            Color::DarkGreen => "mcformat-dark-green",
            Color::DarkAqua => "mcformat-dark-aqua",
            Color::DarkRed => "mcformat-dark-red",
            Color::DarkPurple => "mcformat-dark-purple",
            Color::Gold => "mcformat-gold",
            Color::Gray => "mcformat-gray",
            Color::DarkGray => "mcformat-dark-gray",
            Color::Blue => "mcformat-blue",
            Color::Green => "mcformat-green",
            Color::Aqua => "mcformat-aqua",
            Color::Red => "mcformat-red",
            Color::LightPurple => "mcformat-light-purple",
            Color::Yellow => "mcformat-yellow",
            Color::White => "mcformat-white",
        }
    }
}

/// Text decorations. Declaration order is the order classes are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Obfuscated,
}

impl Style {
    const ALL: [Style; 5] = [
        Style::Bold,
        Style::Strikethrough,
        Style::Underline,
        Style::Italic,
        Style::Obfuscated,
    ];

    fn from_code(code: char) -> Option<Style> {
        match code {
            'k' => Some(Style::Obfuscated),
            'l' => Some(Style::Bold),
            'm' => Some(Style::Strikethrough),
            'n' => Some(Style::Underline),
            'o' => Some(Style::Italic),
            _ => None,
        }
    }

    /// CSS class for this style.
    pub fn class(self) -> &'static str {
        match self {
            Style::Bold => "mcformat-bold",
            Style::Strikethrough => "mcformat-strikethrough",
            Style::Underline => "mcformat-underline",
            Style::Italic => "mcformat-italic",
            Style::Obfuscated => "mcformat-obfuscated",
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A recognised formatting code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCode {
    Color(Color),
    Style(Style),
    Reset,
}

impl FormatCode {
    /// Interpret the character after a [`MARKER`], case-insensitively.
    pub fn from_char(code: char) -> Option<FormatCode> {
        let code = code.to_ascii_lowercase();
        if code == 'r' {
            return Some(FormatCode::Reset);
        }
        Color::from_code(code)
            .map(FormatCode::Color)
            .or_else(|| Style::from_code(code).map(FormatCode::Style))
    }
}

/// Active color and styles while walking a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatState {
    color: Option<Color>,
    styles: u8,
}

impl FormatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the state for one formatting code.
    pub fn apply(&mut self, code: FormatCode) {
        match code {
            FormatCode::Reset => *self = Self::default(),
            FormatCode::Color(color) => self.color = Some(color),
            FormatCode::Style(style) => self.styles |= style.bit(),
        }
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn has_style(&self, style: Style) -> bool {
        self.styles & style.bit() != 0
    }

    /// Active styles in emission order.
    pub fn styles(&self) -> impl Iterator<Item = Style> + '_ {
        Style::ALL.into_iter().filter(|s| self.has_style(*s))
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.styles == 0
    }

    /// `class` attribute value for a text run under this state.
    pub fn class_list(&self) -> String {
        if self.is_empty() {
            return RESET_CLASSES.to_string();
        }

        let mut classes = String::from("mcformat");
        if let Some(color) = self.color {
            classes.push(' ');
            classes.push_str(color.class());
        }
        for style in self.styles() {
            classes.push(' ');
            classes.push_str(style.class());
        }
        classes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Code { code: FormatCode, raw: char },
}

/// Split `text` into literal runs and recognised two-character codes.
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut run_start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch != MARKER {
            continue;
        }
        let Some(&(code_idx, raw)) = chars.peek() else {
            break;
        };
        let Some(code) = FormatCode::from_char(raw) else {
            continue;
        };
        chars.next();

        if run_start < idx {
            tokens.push(Token::Text(&text[run_start..idx]));
        }
        tokens.push(Token::Code { code, raw });
        run_start = code_idx + raw.len_utf8();
    }

    if run_start < text.len() {
        tokens.push(Token::Text(&text[run_start..]));
    }
    tokens
}

/// Escape `&`, `<`, `>` and `"` for use in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Convert a message with formatting codes into `mcformat` markup.
///
/// ```
/// use motd_embed::motd::parse;
///
/// assert_eq!(parse(""), "");
/// assert_eq!(parse("hi"), r#"<span class="mcformat mcformat-reset">hi</span>"#);
/// ```
pub fn parse(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // The marker is not one of the escaped characters, so escaping first
    // leaves every code intact.
    let escaped = escape_html(text);

    let mut state = FormatState::new();
    let mut html = String::with_capacity(escaped.len() * 2);

    for token in tokenize(&escaped) {
        match token {
            Token::Code { code, raw } => {
                state.apply(code);
                html.push_str(r#"<span class="mcformat-code">"#);
                html.push(MARKER);
                html.push(raw);
                html.push_str("</span>");
            }
            Token::Text(run) => {
                html.push_str(r#"<span class=""#);
                html.push_str(&state.class_list());
                html.push_str(r#"">"#);
                html.push_str(run);
                html.push_str("</span>");
            }
        }
    }

    html
}

/// A status description: either a plain string or a JSON text component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    Text(String),
    Component(TextComponent),
}

/// The subset of a chat component that is rendered: its own `text` and the
/// `extra` entries that follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextComponent {
    pub text: Option<String>,
    pub extra: Vec<Description>,
}

impl Description {
    /// Build a description from the `description` field of a status
    /// response. Values that are neither strings nor objects become empty
    /// text.
    pub fn from_json(value: &Value) -> Description {
        match value {
            Value::String(text) => Description::Text(text.clone()),
            Value::Object(map) => Description::Component(TextComponent {
                text: map.get("text").and_then(Value::as_str).map(str::to_string),
                extra: map
                    .get("extra")
                    .and_then(Value::as_array)
                    .map(|items| items.iter().map(Description::from_json).collect())
                    .unwrap_or_default(),
            }),
            _ => Description::Text(String::new()),
        }
    }
}

impl From<&str> for Description {
    fn from(text: &str) -> Self {
        Description::Text(text.to_string())
    }
}

/// Render a description tree.
///
/// Only one level is expanded: the component's own text, then each `extra`
/// entry. An `extra` entry that is itself a component contributes only its
/// `text`; its own `extra` list is not rendered. Every piece is parsed on its
/// own, so formatting does not carry from one piece into the next.
pub fn parse_tree(node: &Description) -> String {
    match node {
        Description::Text(text) => parse(text),
        Description::Component(component) => {
            let mut html = component.text.as_deref().map(parse).unwrap_or_default();
            for entry in &component.extra {
                match entry {
                    Description::Text(text) => html.push_str(&parse(text)),
                    Description::Component(inner) => {
                        if let Some(text) = &inner.text {
                            html.push_str(&parse(text));
                        }
                    }
                }
            }
            html
        }
    }
}
