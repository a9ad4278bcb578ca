//! Designer commands and their line-oriented text form.
//!
//! Every UI affordance (toolbar button, layers-panel arrow, shortcut)
//! boils down to one `DesignerCommand`. The text form lets a script drive
//! the designer without a UI:
//!
//! ```text
//! # lobby welcome screen
//! add text
//! set content "Welcome"
//! move 40 -20
//! add rectangle
//! layer down
//! zoom in
//! ```
//!
//! Built on `winnow` 0.7. Element-targeting commands act on the current
//! selection.

use crate::store::{SwapDirection, ZStep};
use crate::tools::Tool;
use sd_core::{Color, ElementId, ElementKind, Orientation, PropValue, Resolution};
use std::str::FromStr;
use winnow::ascii::{space0, space1};
use winnow::combinator::{delimited, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

#[derive(Debug, Clone, PartialEq)]
pub enum DesignerCommand {
    // ── Membership ──
    Add(ElementKind),
    Duplicate,
    Delete,

    // ── Selection ──
    Select(ElementId),
    SelectLayer(usize),
    Deselect,

    // ── Z-order ──
    /// `bump_z_index` on the selection.
    BumpZ(ZStep),
    /// `swap_with_neighbor` on the selection (layers-panel arrows).
    SwapLayer(SwapDirection),
    SetZIndex(i32),

    // ── Edit ──
    MoveBy { dx: f64, dy: f64 },
    MoveTo { x: f64, y: f64 },
    Resize { width: f64, height: f64 },
    Rename(String),
    SetProperty { key: String, value: PropValue },

    // ── Tools & view ──
    SetTool(Tool),
    ToggleLastTool,
    ZoomIn,
    ZoomOut,
    ZoomToFit,

    // ── Layout header ──
    SetBackground(Color),
    RenameLayout(String),
    SetResolution(Resolution),
}

/// Parse a whole script: one command per line, blank lines and `#`
/// comments skipped. Errors carry the 1-based line number.
#[must_use = "parsing result should be used"]
pub fn parse_script(input: &str) -> Result<Vec<DesignerCommand>, String> {
    let mut commands = Vec::new();
    for (n, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command = parse_command(line).map_err(|e| format!("line {}: {e}", n + 1))?;
        commands.push(command);
    }
    Ok(commands)
}

/// Parse a single command line.
#[must_use = "parsing result should be used"]
pub fn parse_command(line: &str) -> Result<DesignerCommand, String> {
    let mut rest = line.trim();
    let keyword = parse_keyword
        .parse_next(&mut rest)
        .map_err(|_| format!("expected a command, found `{line}`"))?;

    let command = match parse_arguments(keyword, &mut rest) {
        Ok(Some(command)) => command,
        Ok(None) => return Err(format!("unknown command `{keyword}`")),
        Err(_) => return Err(format!("invalid arguments for `{keyword}` in `{line}`")),
    };

    skip_space(&mut rest);
    if !rest.is_empty() {
        return Err(format!("unexpected trailing input `{rest}`"));
    }
    Ok(command)
}

/// Arguments for `keyword`. `Ok(None)` when the keyword is unknown.
fn parse_arguments(keyword: &str, input: &mut &str) -> ModalResult<Option<DesignerCommand>> {
    let command = match keyword {
        "add" => DesignerCommand::Add(preceded_space(parse_kind, input)?),
        "duplicate" => DesignerCommand::Duplicate,
        "delete" => DesignerCommand::Delete,
        "select" => DesignerCommand::Select(preceded_space(parse_element_ref, input)?),
        "select-layer" => DesignerCommand::SelectLayer(preceded_space(parse_integer::<usize>, input)?),
        "deselect" => DesignerCommand::Deselect,
        "forward" => DesignerCommand::BumpZ(ZStep::Forward),
        "backward" => DesignerCommand::BumpZ(ZStep::Backward),
        "layer" => DesignerCommand::SwapLayer(preceded_space(parse_swap_direction, input)?),
        "z" => DesignerCommand::SetZIndex(preceded_space(parse_integer::<i32>, input)?),
        "move" => {
            let (dx, dy) = parse_number_pair(input)?;
            DesignerCommand::MoveBy { dx, dy }
        }
        "move-to" => {
            let (x, y) = parse_number_pair(input)?;
            DesignerCommand::MoveTo { x, y }
        }
        "resize" => {
            let (width, height) = parse_number_pair(input)?;
            DesignerCommand::Resize { width, height }
        }
        "rename" => DesignerCommand::Rename(preceded_space(parse_quoted_string, input)?.into()),
        "set" => {
            let key = preceded_space(parse_identifier, input)?.to_string();
            let value = preceded_space(parse_prop_value, input)?;
            DesignerCommand::SetProperty { key, value }
        }
        "tool" => DesignerCommand::SetTool(Tool::from_name(preceded_space(parse_token, input)?)),
        "toggle-tool" => DesignerCommand::ToggleLastTool,
        "zoom" => match preceded_space(parse_identifier, input)? {
            "in" => DesignerCommand::ZoomIn,
            "out" => DesignerCommand::ZoomOut,
            "fit" => DesignerCommand::ZoomToFit,
            _ => return Err(backtrack()),
        },
        "background" => DesignerCommand::SetBackground(preceded_space(parse_hex_color, input)?),
        "layout-name" => {
            DesignerCommand::RenameLayout(preceded_space(parse_quoted_string, input)?.into())
        }
        "resolution" => DesignerCommand::SetResolution(parse_resolution(input)?),
        _ => return Ok(None),
    };
    Ok(Some(command))
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

/// Consume optional whitespace (concrete error type avoids inference issues).
fn skip_space(input: &mut &str) {
    let _: Result<&str, ErrMode<ContextError>> = space0.parse_next(input);
}

/// Require at least one space, then run `parser`.
fn preceded_space<'a, O>(
    mut parser: impl Parser<&'a str, O, ErrMode<ContextError>>,
    input: &mut &'a str,
) -> ModalResult<O> {
    space1.parse_next(input)?;
    parser.parse_next(input)
}

fn parse_keyword<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '-').parse_next(input)
}

fn parse_identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

/// Any run of non-whitespace characters.
fn parse_token<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_till(1.., |c: char| c.is_whitespace()).parse_next(input)
}

/// `@text_3` or `text_3`.
fn parse_element_ref(input: &mut &str) -> ModalResult<ElementId> {
    let _ = opt('@').parse_next(input)?;
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || c == '-')
        .map(ElementId::intern)
        .parse_next(input)
}

fn parse_kind(input: &mut &str) -> ModalResult<ElementKind> {
    let name = parse_identifier.parse_next(input)?;
    ElementKind::parse(name).ok_or_else(backtrack)
}

fn parse_swap_direction(input: &mut &str) -> ModalResult<SwapDirection> {
    match parse_identifier.parse_next(input)? {
        "up" => Ok(SwapDirection::Up),
        "down" => Ok(SwapDirection::Down),
        _ => Err(backtrack()),
    }
}

fn parse_hex_color(input: &mut &str) -> ModalResult<Color> {
    let _ = '#'.parse_next(input)?;
    let hex_digits: &str = take_while(1..=8, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    Color::from_hex(hex_digits).ok_or_else(backtrack)
}

fn parse_number(input: &mut &str) -> ModalResult<f64> {
    let start = *input;
    if input.starts_with('-') {
        *input = &input[1..];
    }
    let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    if input.starts_with('.') {
        *input = &input[1..];
        let _ =
            take_while::<_, _, ContextError>(0.., |c: char| c.is_ascii_digit()).parse_next(input);
    }
    // a long enough digit run parses to `inf`
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(backtrack)
}

fn parse_integer<T: FromStr>(input: &mut &str) -> ModalResult<T> {
    let start = *input;
    if input.starts_with('-') {
        *input = &input[1..];
    }
    let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    let matched = &start[..start.len() - input.len()];
    matched.parse::<T>().map_err(|_| backtrack())
}

fn parse_number_pair(input: &mut &str) -> ModalResult<(f64, f64)> {
    let a = preceded_space(parse_number, input)?;
    let b = preceded_space(parse_number, input)?;
    Ok((a, b))
}

fn parse_quoted_string<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited('"', take_till(0.., '"'), '"').parse_next(input)
}

/// `"text"`, `true`/`false`, a number, or a bare word taken as text
/// (so `set fillColor #FF0000` and `set stretch Fill` work unquoted).
fn parse_prop_value(input: &mut &str) -> ModalResult<PropValue> {
    if input.starts_with('"') {
        return parse_quoted_string
            .map(|s: &str| PropValue::Text(s.to_string()))
            .parse_next(input);
    }
    let token = parse_token.parse_next(input)?;
    let value = match token {
        "true" => PropValue::Bool(true),
        "false" => PropValue::Bool(false),
        _ => {
            let mut rest = token;
            match parse_number(&mut rest) {
                Ok(n) if rest.is_empty() => PropValue::Number(n),
                _ => PropValue::from(token),
            }
        }
    };
    Ok(value)
}

/// `W H` with an optional `landscape`/`portrait`; without one the
/// orientation follows the aspect ratio.
fn parse_resolution(input: &mut &str) -> ModalResult<Resolution> {
    let width = preceded_space(parse_integer::<u32>, input)?;
    let height = preceded_space(parse_integer::<u32>, input)?;

    let checkpoint = *input;
    let orientation = match preceded_space(parse_identifier, input) {
        Ok(word) => Orientation::parse(word).ok_or_else(backtrack)?,
        Err(_) => {
            *input = checkpoint;
            if width >= height {
                Orientation::Landscape
            } else {
                Orientation::Portrait
            }
        }
    };
    Ok(Resolution {
        width,
        height,
        orientation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_membership_commands() {
        assert_eq!(
            parse_command("add rectangle"),
            Ok(DesignerCommand::Add(ElementKind::Rectangle))
        );
        assert_eq!(parse_command("duplicate"), Ok(DesignerCommand::Duplicate));
        assert_eq!(parse_command("  delete  "), Ok(DesignerCommand::Delete));
    }

    #[test]
    fn parse_ordering_commands() {
        assert_eq!(
            parse_command("layer down"),
            Ok(DesignerCommand::SwapLayer(SwapDirection::Down))
        );
        assert_eq!(
            parse_command("forward"),
            Ok(DesignerCommand::BumpZ(ZStep::Forward))
        );
        assert_eq!(parse_command("z -3"), Ok(DesignerCommand::SetZIndex(-3)));
    }

    #[test]
    fn parse_geometry_commands() {
        assert_eq!(
            parse_command("move -12.5 40"),
            Ok(DesignerCommand::MoveBy { dx: -12.5, dy: 40.0 })
        );
        assert_eq!(
            parse_command("resize 640 360"),
            Ok(DesignerCommand::Resize {
                width: 640.0,
                height: 360.0
            })
        );
    }

    #[test]
    fn parse_select_forms() {
        assert_eq!(
            parse_command("select @text_4"),
            Ok(DesignerCommand::Select(ElementId::intern("text_4")))
        );
        assert_eq!(
            parse_command("select promo-video"),
            Ok(DesignerCommand::Select(ElementId::intern("promo-video")))
        );
        assert_eq!(
            parse_command("select-layer 2"),
            Ok(DesignerCommand::SelectLayer(2))
        );
    }

    #[test]
    fn parse_property_values() {
        let set = |line: &str| match parse_command(line) {
            Ok(DesignerCommand::SetProperty { key, value }) => (key, value),
            other => panic!("expected SetProperty, got {other:?}"),
        };
        assert_eq!(
            set(r#"set content "Happy Hour 5-7""#),
            ("content".into(), PropValue::Text("Happy Hour 5-7".into()))
        );
        assert_eq!(set("set fontSize 48"), ("fontSize".into(), PropValue::Number(48.0)));
        assert_eq!(set("set isLocked true"), ("isLocked".into(), PropValue::Bool(true)));
        assert_eq!(
            set("set fillColor #FF8800"),
            ("fillColor".into(), PropValue::Text("#FF8800".into()))
        );
        assert_eq!(
            set("set stretch UniformToFill"),
            ("stretch".into(), PropValue::Text("UniformToFill".into()))
        );
        assert_eq!(
            set("set version 1.2.3"),
            ("version".into(), PropValue::Text("1.2.3".into()))
        );
    }

    #[test]
    fn parse_view_and_header_commands() {
        assert_eq!(parse_command("zoom fit"), Ok(DesignerCommand::ZoomToFit));
        assert_eq!(
            parse_command("tool lasso"),
            Ok(DesignerCommand::SetTool(Tool::Custom("lasso".into())))
        );
        assert_eq!(
            parse_command("background #202020"),
            Ok(DesignerCommand::SetBackground(Color::rgb(0x20, 0x20, 0x20)))
        );
        assert_eq!(
            parse_command(r#"layout-name "Drive-Thru""#),
            Ok(DesignerCommand::RenameLayout("Drive-Thru".into()))
        );
        assert_eq!(
            parse_command("resolution 1080 1920"),
            Ok(DesignerCommand::SetResolution(Resolution {
                width: 1080,
                height: 1920,
                orientation: Orientation::Portrait,
            }))
        );
        assert_eq!(
            parse_command("resolution 1920 1080 portrait"),
            Ok(DesignerCommand::SetResolution(Resolution {
                width: 1920,
                height: 1080,
                orientation: Orientation::Portrait,
            }))
        );
    }

    #[test]
    fn parse_errors_are_descriptive() {
        assert_eq!(
            parse_command("explode"),
            Err("unknown command `explode`".to_string())
        );
        assert!(parse_command("add hologram").unwrap_err().contains("invalid arguments"));
        assert!(parse_command("zoom sideways").is_err());
        assert!(parse_command("move 10").is_err());
        assert!(parse_command("delete now").unwrap_err().contains("trailing"));
        assert!(parse_command("resolution 800 600 diagonal").is_err());
    }

    #[test]
    fn overflowing_numbers_are_rejected() {
        let huge = "9".repeat(400);
        assert!(
            parse_command(&format!("move {huge} 0"))
                .unwrap_err()
                .contains("invalid arguments")
        );
        assert!(parse_command(&format!("z {huge}")).is_err());
        assert!(parse_command(&format!("resolution {huge} 1080")).is_err());
        // falls back to text, which a numeric key then refuses
        assert_eq!(
            parse_command(&format!("set fontSize {huge}")),
            Ok(DesignerCommand::SetProperty {
                key: "fontSize".into(),
                value: PropValue::Text(huge.clone()),
            })
        );
    }

    #[test]
    fn parse_script_skips_comments_and_numbers_errors() {
        let script = "# header\n\nadd text\n  # indented comment\nzoom in\n";
        assert_eq!(
            parse_script(script),
            Ok(vec![
                DesignerCommand::Add(ElementKind::Text),
                DesignerCommand::ZoomIn
            ])
        );

        let broken = "add text\nadd text\nwobble\n";
        assert_eq!(parse_script(broken), Err("line 3: unknown command `wobble`".into()));
    }
}
