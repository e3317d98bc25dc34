// ABOUTME: A self-contained sample presentation source
// ABOUTME: Written by the `sample` command to show every markup and theme feature

use crate::errors::Result;
use crate::utils;
use log::info;
use std::fs;
use std::path::Path;

pub const SAMPLE_SOURCE: &str = r#"---metadata
title: Sample Presentation
subtitle: extended markdown to impress.js
authors:
  - Jane Doe
  - John Roe
affiliations: [Example University]
date: 2026
max_time: 20
---endmetadata

---theme_slide_global
- width: 1000px
- height: 700px
- background: white
- slide-transition: horizontal
---endtheme_slide_global

---theme_slide_content
- padding: 1% 2%
- font-size: 110%
---endtheme_slide_content

---theme_slide_header_1
- height: 10%
- background: #4788B3
- color: white
- content: $slidetitle
---endtheme_slide_header_1

---theme_slide_footer_1
- height: 5%
- font-size: 80%
- content: $authors_short $slidenumber/$total_slides_number
---endtheme_slide_footer_1

---theme_box
- border: 1px solid #4788B3
---endtheme_box

---titlepage[plain]
# $title

## $subtitle

$authors, $affiliations ($date)
---endtitlepage

# Introduction

## Environments

#### Boxes and notes

$box
$style[width: 80%;]
$caption(Definition){Slide}
$content{A *slide* is a step of the presentation.}
$endbox

$note
$content{Notes are boxes with their own theme.}
$endnote

#### Columns

$columns
$column[1]
Left column, one third wide.
$column[2]
$figure
$content{images/plot.png}
$caption{A figure in the right column}
$endfigure
$endcolumns

#### Tables

$table
$caption{Numbers}
$content{
| a | b |
|---|---|
| 1 | 2 |
}
$endtable

#### Math and code

Inline math such as $e^{i\pi} + 1 = 0$ and display math:

$$
\begin{matrix} a & b \\ c & d \end{matrix}
$$

```rust
fn main() {
    println!("highlighted by highlight.js");
}
```

## Positioning

#### A rotated slide

---slide
---theme_slide_global
- data-rotate-z: 90
- slide-transition: vertical
---endtheme_slide_global
---endslide

This slide is rotated and placed below the previous one.

#### $overview

# Contents

#### Table of contents

$toc
"#;

/// Write the sample source to `path`, creating parent directories.
pub fn write_sample(path: &Path) -> Result<()> {
    utils::ensure_parent_directory_exists(path)?;
    fs::write(path, SAMPLE_SOURCE)?;
    info!("Sample source written to {:?}", path);
    Ok(())
}
