//! Minimal `{{ key }}` template substitution for small output fragments.

/// Render a template by substituting named variables.
pub trait TemplateRenderer {
    fn render(&self, template: &str, variables: &[(&str, String)]) -> String;
}

/// Literal `{{ key }}` replacement; unknown keys are left in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleTemplateRenderer;

impl TemplateRenderer for SimpleTemplateRenderer {
    fn render(&self, template: &str, variables: &[(&str, String)]) -> String {
        let mut out = template.to_string();

        for (key, value) in variables {
            out = out.replace(&format!("{{{{ {} }}}}", key), value);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitution() {
        let renderer = SimpleTemplateRenderer;
        let out = renderer.render(
            r#"<a href="{{ url }}">{{ title }}</a>"#,
            &[("url", "x.html".into()), ("title", "X".into())],
        );
        assert_eq!(out, r#"<a href="x.html">X</a>"#);
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let renderer = SimpleTemplateRenderer;
        assert_eq!(renderer.render("{{ missing }}", &[]), "{{ missing }}");
    }
}
