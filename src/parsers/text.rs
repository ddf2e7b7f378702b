use scraper::{ElementRef, Node};

const BLOCK_TAGS: &[&str] = &["div", "p", "li", "tr", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Returns the text of an element roughly as a browser renders it.
///
/// Line breaks come from `<br>` and block-level children. Whitespace inside
/// each line is collapsed and blank lines are dropped.
pub fn rendered_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();

    for node in element.descendants().skip(1) {
        match node.value() {
            Node::Text(text) => raw.push_str(&text.replace(['\n', '\r'], " ")),
            Node::Element(el) if el.name() == "br" || BLOCK_TAGS.contains(&el.name()) => {
                raw.push('\n')
            }
            _ => {}
        }
    }

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn render(html: &str) -> String {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse("#target").unwrap();
        rendered_text(doc.select(&sel).next().unwrap())
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(
            render("<div id='target'>\n   Total   Credits:\n 4  </div>"),
            "Total Credits: 4"
        );
    }

    #[test]
    fn breaks_become_newlines() {
        assert_eq!(
            render("<div id='target'>Prerequisite: CSE 101<br>Not open to freshmen</div>"),
            "Prerequisite: CSE 101\nNot open to freshmen"
        );
    }

    #[test]
    fn inline_markup_is_flattened() {
        assert_eq!(
            render("<div id='target'><b>Fall</b> of <i>every</i> year</div>"),
            "Fall of every year"
        );
    }

    #[test]
    fn nested_blocks_split_lines() {
        assert_eq!(
            render("<div id='target'><div>Fall of every year</div><div>Spring of odd years</div></div>"),
            "Fall of every year\nSpring of odd years"
        );
    }
}
