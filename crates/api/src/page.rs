//! Server-rendered prediction form.

use nft_predictor_core::domain::variant::Variant;
use nft_predictor_core::form::fields;
use nft_predictor_core::i18n::{get_texts, Language, LANGUAGE_SELECTOR_LABEL, SETTINGS_HEADER};
use std::fmt::Write;

const PAGE_TITLE: &str = "💎 NFT Price Predictor";

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(String),
    InputError(String),
}

pub fn render(
    variant: Variant,
    language: Language,
    inputs: &[String],
    outcome: Option<&Outcome>,
) -> String {
    let texts = get_texts(variant, language);
    let mut html = String::with_capacity(4096);

    // `write!` into a String cannot fail.
    let _ = write!(
        html,
        "<!doctype html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n</head>\n<body>\n",
        lang = language.key(),
        title = escape(PAGE_TITLE),
    );

    let _ = write!(
        html,
        "<aside>\n<h2>{settings}</h2>\n<form method=\"get\" action=\"/{variant}\">\n\
         <fieldset>\n<legend>{selector}</legend>\n",
        settings = escape(SETTINGS_HEADER),
        variant = variant.key(),
        selector = escape(LANGUAGE_SELECTOR_LABEL),
    );
    for option in Language::ALL {
        let checked = if option == language { " checked" } else { "" };
        let _ = write!(
            html,
            "<label><input type=\"radio\" name=\"lang\" value=\"{key}\"{checked} \
             onchange=\"this.form.submit()\"> {label}</label>\n",
            key = option.key(),
            label = escape(option.label()),
        );
    }
    html.push_str("</fieldset>\n</form>\n</aside>\n");

    let _ = write!(
        html,
        "<main>\n<h1>{title}</h1>\n<p>{description}</p>\n<h2>{header}</h2>\n\
         <form method=\"post\" action=\"/{variant}?lang={lang}\">\n",
        title = escape(texts.title),
        description = escape(texts.description),
        header = escape(texts.header),
        variant = variant.key(),
        lang = language.key(),
    );
    for ((field, label), value) in fields(variant)
        .iter()
        .zip(texts.field_labels)
        .zip(inputs)
    {
        let _ = write!(
            html,
            "<p><label for=\"{name}\">{label}</label><br>\
             <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" step=\"any\" \
             data-step=\"{step}\" value=\"{value}\"></p>\n",
            name = field.name,
            label = escape(label),
            min = field.min,
            step = field.step,
            value = escape(value),
        );
    }
    let _ = write!(
        html,
        "<button type=\"submit\">{button}</button>\n</form>\n",
        button = escape(texts.button_label),
    );

    match outcome {
        Some(Outcome::Success(message)) => {
            let _ = writeln!(html, "<p class=\"success\">{}</p>", escape(message));
        }
        Some(Outcome::InputError(message)) => {
            let _ = writeln!(html, "<p class=\"error\">{}</p>", escape(message));
        }
        None => {}
    }

    let _ = write!(
        html,
        "<p class=\"info\">{}</p>\n</main>\n</body>\n</html>\n",
        escape(texts.disclaimer),
    );
    html
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
