//! MathML foreign content support.
//!
//! [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

use crate::tokenizer::AttributeList;

/// [§ 13.2.6.3 Adjust MathML attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-mathml-attributes)
///
/// "When the steps below require the user agent to adjust MathML attributes for
/// a token, then, if the token has an attribute named definitionurl, change
/// its name to definitionURL (note the case difference)."
const MATHML_ATTRIBUTE_ADJUSTMENTS: &[(&str, &str)] = &[("definitionurl", "definitionURL")];

/// [§ 13.2.6.3 Adjust MathML attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-mathml-attributes)
pub fn adjust_mathml_attributes(attributes: &mut AttributeList) {
    for attr in attributes.iter_mut() {
        if let Some(&(_, to)) = MATHML_ATTRIBUTE_ADJUSTMENTS
            .iter()
            .find(|&&(from, _)| attr.name == from)
        {
            attr.name = to.to_string();
        }
    }
}
