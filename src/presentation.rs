// ABOUTME: Presentation driver: splits a document into chapters, sections and slides
// ABOUTME: Numbers slides, builds TOC slides and assembles the impress.js document

use crate::config::Config;
use crate::markdown::MarkdownConverter;
use crate::metadata::Metadata;
use crate::position::Position;
use crate::resources::ResourceFile;
use crate::slide::{Slide, Titlepage};
use crate::source::split_global_theme;
use crate::theme::Theme;
use crate::utils::escape_html;
use log::{debug, info, warn};

const LEVEL_NAMES: [&str; 3] = ["chapter", "section", "subsection"];
const SLIDE_LEVEL: usize = 4;
const TOC_TITLE: &str = "Table of contents";
/// MathJax reads `$...$` as inline math only when told to.
const MATHJAX_CONFIG: &str = "<script>MathJax = { tex: { inlineMath: [['$', '$'], ['\\\\(', '\\\\)']], processEscapes: true } };</script>\n";

/// A chapter, section or subsection heading with the first slide it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// 1 = chapter, 2 = section, 3 = subsection.
    pub level: usize,
    /// Dotted number such as `2.1`.
    pub number: String,
    pub title: String,
    pub slide: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub metadata: Metadata,
    pub theme: Theme,
    pub titlepage: Titlepage,
    pub title_slide: Option<Slide>,
    pub slides: Vec<Slide>,
    pub outline: Vec<OutlineEntry>,
}

/// A heading and the text up to the next heading.
#[derive(Debug)]
struct Block {
    level: usize,
    title: String,
    body: String,
}

#[derive(Debug)]
enum PlannedBody {
    Text(String),
    /// A table of contents down to the given depth.
    Toc(usize),
}

/// A slide whose number is known but whose body may still depend on the
/// finished outline.
#[derive(Debug)]
struct PlannedSlide {
    title: String,
    body: PlannedBody,
    context: Metadata,
    local_number: usize,
    number: usize,
}

impl Presentation {
    pub fn parse(source: &str, config: &Config) -> Self {
        let (mut metadata, rest) = Metadata::parse(source);
        let (theme_source, rest) = split_global_theme(&rest);
        let theme = if theme_source.trim().is_empty() {
            Theme::default()
        } else {
            Theme::new(Some(&theme_source))
        };
        let (titlepage, rest) = Titlepage::extract(false, &rest, 1);
        let first_number = if titlepage.found { 2 } else { 1 };

        let blocks = split_blocks(&rest);
        let (plan, outline) = plan_slides(&blocks, first_number, config);
        let total = plan.len() + usize::from(titlepage.found);
        metadata.set("total_slides_number", &total.to_string());

        let mut presentation = Self {
            metadata,
            theme,
            titlepage,
            title_slide: None,
            slides: Vec::with_capacity(plan.len()),
            outline,
        };
        let toc = presentation.toc_html(config.toc_depth);
        presentation.metadata.set("toc", &toc);
        presentation.title_slide = presentation
            .titlepage
            .slide(&presentation.metadata, &presentation.theme);

        for planned in plan {
            let mut context = presentation.metadata.clone();
            context.extend(&planned.context);
            let body = match planned.body {
                PlannedBody::Text(body) => body,
                PlannedBody::Toc(depth) => presentation.toc_html(depth),
            };
            let slide = Slide::new(
                &body,
                &planned.title,
                &context,
                Some(&presentation.theme),
                planned.local_number,
                planned.number,
            );
            presentation.slides.push(slide);
        }
        info!(
            "Parsed presentation: {} slides, {} outline entries",
            total,
            presentation.outline.len()
        );
        presentation
    }

    /// Nested lists linking to the first slide of every chapter, section and
    /// subsection down to `depth`.
    pub fn toc_html(&self, depth: usize) -> String {
        let mut html = String::new();
        let mut open = 0usize;
        for entry in self.outline.iter().filter(|e| e.level <= depth) {
            let level = entry.level.min(open + 1);
            if level > open {
                html.push_str("\n<ul class=\"toc\">");
            } else {
                html.push_str("</li>");
                for _ in level..open {
                    html.push_str("\n</ul>\n</li>");
                }
            }
            open = level;
            html.push_str(&format!(
                "\n<li class=\"toc-{}\"><a href=\"#/slide-{}\">{} {}</a>",
                LEVEL_NAMES[entry.level - 1],
                entry.slide,
                entry.number,
                escape_html(&entry.title)
            ));
        }
        if open > 0 {
            html.push_str("</li>");
            for _ in 1..open {
                html.push_str("\n</ul>\n</li>");
            }
            html.push_str("\n</ul>\n");
        }
        html.trim_start().to_string()
    }

    /// Full theme CSS followed by the scoped overrides of every slide.
    pub fn get_css(&self) -> String {
        let mut css = self.theme.get_css(false);
        for slide in self.title_slide.iter().chain(self.slides.iter()) {
            css.push_str(&slide.get_css(true));
        }
        css
    }

    /// Render the complete impress.js document.
    pub fn to_html(
        &self,
        config: &Config,
        converter: &dyn MarkdownConverter,
        css_files: &[ResourceFile],
        js_files: &[ResourceFile],
    ) -> String {
        let title = self
            .metadata
            .get("title")
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Presentation");

        let mut html_doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html_doc.push_str("<meta charset=\"UTF-8\">\n");
        html_doc.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html_doc.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        html_doc.push_str("<style>");
        html_doc.push_str(&self.get_css());
        html_doc.push_str("</style>\n");
        let highlight = config.highlight_resources();
        if let Some((style, _)) = &highlight {
            push_resources(&mut html_doc, &[ResourceFile::new(style)], "css", false);
        }
        if let Some(mathjax) = &config.mathjax_js {
            html_doc.push_str(MATHJAX_CONFIG);
            html_doc.push_str(&format!(
                "<script id=\"MathJax-script\" async src=\"{}\"></script>\n",
                escape_html(mathjax)
            ));
        }
        push_resources(&mut html_doc, css_files, "css", config.embed_resources);
        html_doc.push_str("</head>\n<body class=\"impress-not-supported\">\n<div id=\"impress\">\n");

        let mut position = Position::new();
        for slide in self.title_slide.iter().chain(self.slides.iter()) {
            html_doc.push_str(&slide.to_html(&mut position, &self.theme, converter));
            html_doc.push('\n');
        }
        html_doc.push_str("</div>\n");

        let impress = ResourceFile::new(&config.impress_js);
        push_resources(
            &mut html_doc,
            std::slice::from_ref(&impress),
            "js",
            config.embed_resources,
        );
        html_doc.push_str("<script>impress().init();</script>\n");
        if let Some((_, script)) = &highlight {
            push_resources(&mut html_doc, &[ResourceFile::new(script)], "js", false);
            html_doc.push_str("<script>hljs.highlightAll();</script>\n");
        }
        push_resources(&mut html_doc, js_files, "js", config.embed_resources);
        html_doc.push_str("</body>\n</html>\n");
        html_doc
    }
}

fn push_resources(html_doc: &mut String, resources: &[ResourceFile], kind: &str, embed: bool) {
    for resource in resources {
        match resource.tag(kind, embed) {
            Ok(tag) => {
                html_doc.push_str(&tag);
                html_doc.push('\n');
            }
            Err(e) => {
                warn!("Failed to include {} resource {}: {}", kind, resource.path, e);
            }
        }
    }
}

/// `#` chapter, `##` section, `###` subsection, `####` slide.
fn heading(line: &str) -> Option<(usize, &str)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > SLIDE_LEVEL {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    Some((hashes, rest.trim()))
}

/// Split the document at headings outside code fences. Text before the first
/// heading belongs to nothing and is dropped.
fn split_blocks(source: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut preamble = String::new();
    let mut fence: Option<&str> = None;

    for line in source.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(open) = fence {
            if trimmed.starts_with(open) {
                fence = None;
            }
        } else if let Some(open) = ["```", "~~~"].into_iter().find(|f| trimmed.starts_with(f)) {
            fence = Some(open);
        } else if let Some((level, title)) = heading(line.trim_end()) {
            blocks.push(Block {
                level,
                title: title.to_string(),
                body: String::new(),
            });
            continue;
        }
        match blocks.last_mut() {
            Some(block) => block.body.push_str(line),
            None => preamble.push_str(line),
        }
    }
    if !preamble.trim().is_empty() {
        warn!("Discarding text before the first heading");
    }
    blocks
}

fn outline_number(counters: &[usize; 3], level: usize) -> String {
    counters[..level]
        .iter()
        .filter(|n| **n > 0)
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Assign global and local numbers in source order, inserting TOC slides at
/// the beginning of chapters, sections and subsections as configured.
fn plan_slides(
    blocks: &[Block],
    first_number: usize,
    config: &Config,
) -> (Vec<PlannedSlide>, Vec<OutlineEntry>) {
    let mut plan = Vec::new();
    let mut outline = Vec::new();
    let mut counters = [0usize; 3];
    let mut context = Metadata::new();
    let mut number = first_number;
    let mut local_number = 0;

    for block in blocks {
        if block.level == SLIDE_LEVEL {
            local_number += 1;
            plan.push(PlannedSlide {
                title: block.title.clone(),
                body: PlannedBody::Text(block.body.clone()),
                context: context.clone(),
                local_number,
                number,
            });
            number += 1;
            continue;
        }

        let level = block.level;
        counters[level - 1] += 1;
        for counter in counters.iter_mut().skip(level) {
            *counter = 0;
        }
        local_number = 0;
        let name = LEVEL_NAMES[level - 1];
        context.set(&format!("{}title", name), &block.title);
        context.set(&format!("{}number", name), &counters[level - 1].to_string());
        for deeper in &LEVEL_NAMES[level..] {
            context.remove(&format!("{}title", deeper));
            context.remove(&format!("{}number", deeper));
        }
        debug!("{} {:?} starts at slide {}", name, block.title, number);
        outline.push(OutlineEntry {
            level,
            number: outline_number(&counters, level),
            title: block.title.clone(),
            slide: number,
        });
        if !block.body.trim().is_empty() {
            warn!("Discarding text after {} heading {:?}", name, block.title);
        }
        if let Some(depth) = config.toc_at_beginning(level) {
            plan.push(PlannedSlide {
                title: TOC_TITLE.to_string(),
                body: PlannedBody::Toc(depth),
                context: context.clone(),
                local_number: 0,
                number,
            });
            number += 1;
        }
    }
    (plan, outline)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "---metadata\ntitle: Demo\n---endmetadata\n---theme_slide_global\n- width: 1000px\n---endtheme_slide_global\n# Intro\n## Basics\n#### First\nOne\n#### Second\nTwo\n## More\n### Details\n#### Third\n```\n# not a chapter\n```\n# Outro\n#### Last\nBye $total_slides_number\n";

    #[test]
    fn test_hierarchy_numbering() {
        let presentation = Presentation::parse(DOC, &Config::default());
        let numbers: Vec<usize> = presentation.slides.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        let locals: Vec<usize> = presentation.slides.iter().map(|s| s.local_number).collect();
        assert_eq!(locals, vec![1, 2, 1, 1]);

        let third = &presentation.slides[2];
        assert_eq!(third.metadata.get("chaptertitle"), Some("Intro"));
        assert_eq!(third.metadata.get("sectionnumber"), Some("2"));
        assert_eq!(third.metadata.get("subsectiontitle"), Some("Details"));
        assert!(third.raw_body.contains("# not a chapter"));

        let last = &presentation.slides[3];
        assert_eq!(last.metadata.get("chapternumber"), Some("2"));
        assert_eq!(last.metadata.get("sectiontitle"), None);
        assert_eq!(presentation.metadata.get("total_slides_number"), Some("4"));
        assert_eq!(presentation.theme.slide.global.dimensions(), (1000.0, 700.0));
    }

    #[test]
    fn test_toc_html_links() {
        let presentation = Presentation::parse(DOC, &Config::default());
        let toc = presentation.toc_html(2);
        assert!(toc.starts_with("<ul class=\"toc\">\n<li class=\"toc-chapter\"><a href=\"#/slide-1\">1 Intro</a>"));
        assert!(toc.contains("<a href=\"#/slide-3\">1.2 More</a>"));
        assert!(!toc.contains("Details"));
        assert!(toc.contains("<a href=\"#/slide-4\">2 Outro</a>"));
        assert_eq!(toc.matches("<ul").count(), toc.matches("</ul>").count());
        assert_eq!(toc.matches("<li").count(), toc.matches("</li>").count());
    }

    #[test]
    fn test_toc_slides_inserted() {
        let config = Config {
            toc_at_chap_beginning: Some(1),
            ..Config::default()
        };
        let source = "---titlepage\n# $title\n---endtitlepage\n# A\n#### a1\n# B\n#### b1\n";
        let presentation = Presentation::parse(source, &config);
        assert!(presentation.title_slide.is_some());
        let titles: Vec<&str> = presentation.slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec![TOC_TITLE, "a1", TOC_TITLE, "b1"]);
        let numbers: Vec<usize> = presentation.slides.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![2, 3, 4, 5]);
        assert!(presentation.slides[0].raw_body.contains("<a href=\"#/slide-4\">2 B</a>"));
        assert_eq!(presentation.metadata.get("total_slides_number"), Some("5"));
    }

    #[test]
    fn test_math_and_highlight_references() {
        let source = "---metadata\ntitle: Maths\n---endmetadata\n#### Euler\n$e^{i\\pi} + 1 = 0$ for $title$\n\n```rust\nfn main() {}\n```\n";
        let presentation = Presentation::parse(source, &Config::default());
        let converter = crate::markdown::ComrakConverter::default();
        let html = presentation.to_html(&Config::default(), &converter, &[], &[]);
        assert!(html.contains("<p>$e^{i\\pi} + 1 = 0$ for $title$</p>"));
        assert!(html.contains("inlineMath: [['$', '$']"));
        assert!(html.contains(&format!(
            "<script id=\"MathJax-script\" async src=\"{}\"></script>",
            crate::config::DEFAULT_MATHJAX_JS
        )));
        assert!(html.contains("styles/github.min.css\">"));
        assert!(html.contains("<code class=\"language-rust\">"));
        let init = html.find("impress().init();").unwrap();
        let highlight = html.find("hljs.highlightAll();").unwrap();
        assert!(init < highlight);

        let plain = Config::default().with_renderers(Some("disable"), true);
        let html = presentation.to_html(&plain, &converter, &[], &[]);
        assert!(!html.contains("MathJax"));
        assert!(!html.contains("hljs"));
    }
}
