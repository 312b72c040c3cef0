use crate::refine::refine;
use crate::transform::{TransformEngine, TransformParams, PASS1_RULES, PASS2_RULES};
use crate::wordml::to_xhtml;

/// Built-in engine: streaming WordprocessingML conversion for the first
/// pass, structural refinement for the second.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordmlEngine;

impl TransformEngine for WordmlEngine {
    fn has_rule_set(&self, rule_set: &str) -> bool {
        matches!(rule_set, PASS1_RULES | PASS2_RULES)
    }

    fn transform(
        &self,
        input: &str,
        rule_set: &str,
        params: &TransformParams,
    ) -> Result<String, String> {
        match rule_set {
            PASS1_RULES => to_xhtml(input, params),
            PASS2_RULES => refine(input, params),
            other => Err(format!("unknown rule set: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{check_engine, run_stages};

    #[test]
    fn both_rule_sets_are_available() {
        let engine = WordmlEngine;
        assert!(check_engine(Some(&engine)).is_ok());
        assert!(!engine.has_rule_set("wordml2xhtml_pass3"));
        assert!(engine
            .transform("", "nope", &TransformParams::default())
            .unwrap_err()
            .contains("nope"));
    }

    #[test]
    fn stages_chain_into_clean_xhtml() {
        let merged = "<?xml version=\"1.0\"?>\n<pass1Container><wordmlContainer>\
            <w:document xmlns:w=\"urn:w\"><w:body>\
            <w:p><w:pPr><w:numPr><w:numId w:val=\"3\"/></w:numPr></w:pPr><w:r><w:t>one</w:t></w:r></w:p>\
            <w:p/>\
            <w:tbl><w:tr><w:tc><w:p><w:r><w:t>c</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
            </w:body></w:document></wordmlContainer><imagesContainer>\n</imagesContainer>\n</pass1Container>";
        let out = run_stages(&WordmlEngine, merged, &TransformParams::default()).unwrap();
        assert!(!out.contains("xmlns=\"http://www.w3.org/1999/xhtml\""));
        assert!(out.contains("<ul><li>one</li>\n</ul>"));
        assert!(out.contains("<table class=\"table table-bordered\">"));
        assert!(out.contains("<td><p>c</p>\n</td>"));
    }
}
