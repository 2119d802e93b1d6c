const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            line-height: 1.6;
            margin: 0;
            padding: 20px;
            max-width: 800px;
            margin: 0 auto;
            background-color: #f5f5f5;
        }
        h1 {
            color: #006666;
            text-align: center;
            border-bottom: 2px solid #006666;
            padding-bottom: 10px;
        }
        .story-content {
            background-color: white;
            padding: 20px;
            border-radius: 5px;
            box-shadow: 0 2px 5px rgba(0,0,0,0.1);
            line-height: 1.8;
        }
        a {
            color: #006666;
            text-decoration: none;
        }
        a:hover {
            text-decoration: underline;
        }
        .back-link {
            margin-top: 20px;
            display: block;
            text-align: center;
        }
        p {
            margin-bottom: 1em;
        }
    </style>
</head>
<body>
    <h1>{title}</h1>
    <div class="story-content">
"#;

const PAGE_TAIL: &str = r#"
    </div>
    <div class="back-link">
        <a href="../index.html">Back to Stories</a>
    </div>
</body>
</html>"#;

/// Full story page with one `<p>` per paragraph.
pub fn render(title: &str, paragraphs: &[String]) -> String {
    render_raw(title, &paragraphs_html(paragraphs))
}

/// Full story page around an already formatted content block.
pub fn render_raw(title: &str, content: &str) -> String {
    let mut page = PAGE_HEAD.replace("{title}", title);
    page.push_str(content);
    page.push_str(PAGE_TAIL);
    page
}

pub fn paragraphs_html(paragraphs: &[String]) -> String {
    paragraphs.iter().map(|p| format!("<p>{}</p>\n", p)).collect()
}
