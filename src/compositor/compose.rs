//! Two-pass template composition

use futures_util::stream::{FuturesUnordered, StreamExt};

use super::placeholder::{FormatSpec, Placeholder};
use super::shorthand::expand_shorthand;
use super::{ComposeReport, Compositor};
use crate::config::CompositorConfig;
use crate::dom::{
    element_paths, node_at_path_mut, parse_fragment, serialize, unescape_html, Element, Node,
    NodePath,
};
use crate::error::WidgetError;
use crate::fragment::{FieldRegistry, Fragment, MimeBundle};

/// Placeholder positions in document order
fn placeholders(nodes: &mut [Node], config: &CompositorConfig) -> Vec<(NodePath, Placeholder)> {
    let paths = element_paths(nodes, &|el| Placeholder::from_element(el, config).is_some());
    paths
        .into_iter()
        .filter_map(|path| {
            let el = node_at_path_mut(nodes, &path)?.as_element()?;
            let placeholder = Placeholder::from_element(el, config)?;
            Some((path, placeholder))
        })
        .collect()
}

/// Marks the placeholders that survived pass 1, so markup produced by
/// inlined text is never taken for a placeholder in pass 2
const SLOT_ATTR: &str = "data-compose-slot";

/// A fragment rendered for one placeholder
struct RenderedField {
    order: usize,
    path: NodePath,
    field: String,
    class: &'static str,
    node: Node,
}

impl<'a> Compositor<'a> {
    /// Render `template` into `host`, replacing whatever `host` held before.
    ///
    /// Placeholders whose field does not resolve are left empty. Only
    /// contract violations (a renderer failure or a control mounted before
    /// being displayed) are returned as errors.
    pub async fn compose(
        &self,
        template: &str,
        registry: &FieldRegistry,
        host: &mut Element,
    ) -> Result<ComposeReport, WidgetError> {
        host.replace_children(Vec::new());
        let mut report = ComposeReport::default();
        if template.is_empty() {
            return Ok(report);
        }

        let sanitized = self.sanitizer.sanitize(template);
        let mut scratch = parse_fragment(&sanitized);
        self.inline_latex_fields(&mut scratch, registry, &mut report);
        let slots = self.mark_slots(&mut scratch);

        let source = unescape_html(&serialize(&scratch));
        let prose = self.renderer.render(&MimeBundle::markdown(source)).await?;
        // Decoding entities can revive markup the first sanitize saw as text
        let cleaned = self.sanitizer.sanitize(&serialize(&[prose]));
        host.replace_children(parse_fragment(&cleaned));
        self.unmark_stray_slots(host, slots);

        self.render_fields(host, registry, &mut report).await?;
        Ok(report)
    }

    /// Expand placeholder shorthand for the registry's fields, then compose
    pub async fn render_template(
        &self,
        template: &str,
        registry: &FieldRegistry,
        host: &mut Element,
    ) -> Result<ComposeReport, WidgetError> {
        let expanded = expand_shorthand(template, &|name| registry.contains(name), &self.config)?;
        self.compose(&expanded, registry, host).await
    }

    /// First pass: LaTeX-context placeholders become literal text so the
    /// Markdown renderer sees complete math
    fn inline_latex_fields(
        &self,
        scratch: &mut [Node],
        registry: &FieldRegistry,
        report: &mut ComposeReport,
    ) {
        for (path, placeholder) in placeholders(scratch, &self.config) {
            if placeholder.format != FormatSpec::Latex {
                continue;
            }
            let replacement = match registry.resolve(&placeholder.field) {
                Some(fragment) => match fragment.plain_text() {
                    Some(text) => {
                        report.inlined.push(placeholder.field);
                        text
                    }
                    None => {
                        tracing::warn!(
                            field = %placeholder.field,
                            "control cannot be placed inside math, skipping"
                        );
                        report.skipped.push(placeholder.field);
                        String::new()
                    }
                },
                None => {
                    tracing::debug!(field = %placeholder.field, "skipping unresolved placeholder");
                    report.skipped.push(placeholder.field);
                    String::new()
                }
            };
            if let Some(node) = node_at_path_mut(scratch, &path) {
                *node = Node::Text(replacement);
            }
        }
    }

    /// Number the placeholders left after pass 1 in document order
    fn mark_slots(&self, scratch: &mut [Node]) -> usize {
        let found = placeholders(scratch, &self.config);
        for (slot, (path, _)) in found.iter().enumerate() {
            if let Some(Node::Element(span)) = node_at_path_mut(scratch, path) {
                span.set_attr(SLOT_ATTR, slot.to_string());
            }
        }
        found.len()
    }

    /// Strip placeholder attributes from spans that carry no slot or a slot
    /// already claimed; they came from inlined text, not from the template
    fn unmark_stray_slots(&self, host: &mut Element, slots: usize) {
        let mut claimed = vec![false; slots];
        for (path, placeholder) in placeholders(&mut host.children, &self.config) {
            let Some(Node::Element(span)) = node_at_path_mut(&mut host.children, &path) else {
                continue;
            };
            let slot = span
                .attr(SLOT_ATTR)
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|s| *s < slots && !claimed[*s]);
            match slot {
                Some(s) => claimed[s] = true,
                None => {
                    tracing::debug!(field = %placeholder.field, "ignoring placeholder from inlined text");
                    span.remove_attr(&self.config.field_name_attr);
                    span.remove_attr(&self.config.format_spec_attr);
                }
            }
            span.remove_attr(SLOT_ATTR);
        }
    }

    /// Second pass: every remaining placeholder is rendered concurrently
    /// into its own span
    async fn render_fields(
        &self,
        host: &mut Element,
        registry: &FieldRegistry,
        report: &mut ComposeReport,
    ) -> Result<(), WidgetError> {
        let mut pending = FuturesUnordered::new();
        for (order, (path, placeholder)) in placeholders(&mut host.children, &self.config)
            .into_iter()
            .enumerate()
        {
            match registry.resolve(&placeholder.field) {
                Some(fragment) => {
                    pending.push(self.render_fragment(order, path, placeholder.field, fragment))
                }
                None => {
                    tracing::debug!(field = %placeholder.field, "skipping unresolved placeholder");
                    report.skipped.push(placeholder.field);
                }
            }
        }

        let mut rendered = Vec::with_capacity(pending.len());
        while let Some(result) = pending.next().await {
            let field = result?;
            if let Some(Node::Element(span)) = node_at_path_mut(&mut host.children, &field.path) {
                span.add_class("field");
                span.add_class(field.class);
                span.replace_children(vec![field.node]);
            }
            rendered.push((field.order, field.field));
        }
        rendered.sort_by_key(|(order, _)| *order);
        report.rendered.extend(rendered.into_iter().map(|(_, field)| field));
        Ok(())
    }

    async fn render_fragment(
        &self,
        order: usize,
        path: NodePath,
        field: String,
        fragment: &Fragment,
    ) -> Result<RenderedField, WidgetError> {
        let (class, node) = match fragment {
            Fragment::Formatted(bundle) => ("ofield", self.renderer.render(bundle).await?),
            Fragment::Control(handle) => {
                handle.mark_displayed();
                ("ifield", Node::Element(handle.mount(self.renderer).await?))
            }
        };
        Ok(RenderedField {
            order,
            path,
            field,
            class,
            node,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{AllowListSanitizer, MarkdownRenderer};
    use pretty_assertions::assert_eq;

    fn registry() -> FieldRegistry {
        FieldRegistry::rebuild(
            vec![
                ("x".to_string(), MimeBundle::plain("42")),
                ("y".to_string(), MimeBundle::plain("\\frac{1}{2}")),
            ],
            Vec::new(),
        )
    }

    fn compose(template: &str) -> (Element, ComposeReport) {
        let sanitizer = AllowListSanitizer::new();
        let renderer = MarkdownRenderer::new();
        let compositor = Compositor::new(&sanitizer, &renderer);
        let mut host = Element::new("div");
        let report = pollster::block_on(compositor.compose(template, &registry(), &mut host))
            .expect("compose");
        (host, report)
    }

    #[test]
    fn test_empty_template_renders_nothing() {
        let (host, report) = compose("");
        assert!(host.children.is_empty());
        assert_eq!(report, ComposeReport::default());
    }

    #[test]
    fn test_latex_field_is_inlined_as_text() {
        let (host, report) = compose(r#"$<span data-field-name="y" data-format-spec="latex"></span>$"#);
        assert_eq!(report.inlined, vec!["y"]);
        assert!(report.rendered.is_empty());
        assert!(host.text_content().contains("\\frac{1}{2}"));
    }

    #[test]
    fn test_rich_field_is_rendered_into_span() {
        let (host, report) = compose(r#"Value: <span data-field-name="x"></span>"#);
        assert_eq!(report.rendered, vec!["x"]);
        assert_eq!(host.text_content().trim(), "Value: 42");
        let span = host
            .find(&|el| el.has_attr("data-field-name"))
            .expect("placeholder span");
        assert!(span.has_class("field"));
        assert!(span.has_class("ofield"));
    }

    #[test]
    fn test_unresolved_fields_are_skipped() {
        let (host, report) = compose(
            r#"a <span data-field-name="nope"></span> b <span data-field-name="gone" data-format-spec="latex"></span>"#,
        );
        assert_eq!(report.skipped, vec!["gone", "nope"]);
        assert_eq!(host.text_content().trim(), "a  b");
    }

    #[test]
    fn test_inlined_markup_is_not_substituted_again() {
        let registry = FieldRegistry::rebuild(
            vec![
                ("x".to_string(), MimeBundle::plain("42")),
                (
                    "t".to_string(),
                    MimeBundle::plain(r#"<span data-field-name="x"></span>"#),
                ),
            ],
            Vec::new(),
        );
        let sanitizer = AllowListSanitizer::new();
        let renderer = MarkdownRenderer::new();
        let compositor = Compositor::new(&sanitizer, &renderer);
        let mut host = Element::new("div");
        let report = pollster::block_on(compositor.compose(
            r#"a <span data-field-name="t" data-format-spec="latex"></span> b"#,
            &registry,
            &mut host,
        ))
        .expect("compose");
        assert_eq!(report.inlined, vec!["t"]);
        assert!(report.rendered.is_empty());
        assert!(host.find(&|el| el.has_attr("data-field-name")).is_none());
        assert!(host.find(&|el| el.has_attr(SLOT_ATTR)).is_none());
    }

    #[test]
    fn test_slot_markers_are_removed_after_render() {
        let (host, _) = compose(r#"Value: <span data-field-name="x"></span>"#);
        assert!(host.find(&|el| el.has_attr(SLOT_ATTR)).is_none());
    }
}
