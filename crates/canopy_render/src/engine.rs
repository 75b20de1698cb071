//! Placeholder substitution and buffered output writing.

use std::fs;
use std::path::Path;

use crate::bindings::Bindings;
use crate::error::RenderError;

/// Renders `template`, substituting every `{{name}}` placeholder from
/// `bindings`.
///
/// Placeholder names may contain ASCII alphanumerics and underscores, with
/// optional surrounding whitespace (`{{ name }}`). An unbound placeholder
/// or an unterminated `{{` fails the whole render; no partial output is
/// produced.
pub fn render(template: &str, bindings: &Bindings) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let close = after_open
            .find("}}")
            .ok_or(RenderError::UnterminatedPlaceholder(offset + open))?;
        let name = after_open[..close].trim();
        let value = bindings
            .get(name)
            .ok_or_else(|| RenderError::MissingVariable {
                name: name.to_string(),
                offset: offset + open,
            })?;
        out.push_str(value);
        let consumed = open + 2 + close + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Renders `template` and writes the result to `dest` in one operation.
///
/// The output is fully buffered in memory before anything touches the
/// filesystem, so a render failure never leaves a half-written file. Parent
/// directories are created as needed.
pub fn render_to_file(
    template: &str,
    bindings: &Bindings,
    dest: &Path,
) -> Result<(), RenderError> {
    let text = render(template, bindings)?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|source| RenderError::WriteFailed {
            path: dest.to_path_buf(),
            source,
        })?;
    }
    fs::write(dest, text).map_err(|source| RenderError::WriteFailed {
        path: dest.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_scalars() {
        let b = Bindings::new().set("name", "iris").set("period", 5);
        let out = render("project {{name}} clock {{ period }}ns", &b).unwrap();
        assert_eq!(out, "project iris clock 5ns");
    }

    #[test]
    fn no_placeholders_is_identity() {
        let b = Bindings::new();
        assert_eq!(render("plain text\n", &b).unwrap(), "plain text\n");
    }

    #[test]
    fn missing_variable_fails_with_offset() {
        let b = Bindings::new();
        let err = render("abc {{gone}}", &b).unwrap_err();
        match err {
            RenderError::MissingVariable { name, offset } => {
                assert_eq!(name, "gone");
                assert_eq!(offset, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unterminated_placeholder_fails() {
        let b = Bindings::new().set("x", 1);
        assert!(matches!(
            render("oops {{x", &b),
            Err(RenderError::UnterminatedPlaceholder(5))
        ));
    }

    #[test]
    fn rendering_is_deterministic() {
        let b = Bindings::new().set("a", 1).set("b", 2);
        let t = "{{a}} and {{b}} and {{a}}";
        assert_eq!(render(t, &b).unwrap(), render(t, &b).unwrap());
        assert_eq!(render(t, &b).unwrap(), "1 and 2 and 1");
    }

    #[test]
    fn render_to_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a/b/out.tcl");
        let b = Bindings::new().set("part", "xcu250");
        render_to_file("set_part {{part}}\n", &b, &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "set_part xcu250\n");
    }

    #[test]
    fn failed_render_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.tcl");
        let b = Bindings::new();
        assert!(render_to_file("{{missing}}", &b, &dest).is_err());
        assert!(!dest.exists());
    }
}
