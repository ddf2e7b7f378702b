use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScraperError};

/// A form ready to be posted: the resolved target and the encoded fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub action: Url,
    pub fields: Vec<(String, String)>,
}

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScraperError::ParsingError(format!("Invalid selector `{}`: {}", css, e)))
}

/// Finds the first element matching `css`.
pub fn find_control<'a>(document: &'a Html, css: &str) -> Result<ElementRef<'a>> {
    document
        .select(&selector(css)?)
        .next()
        .ok_or_else(|| ScraperError::ElementNotFound(css.to_string()))
}

/// The `name` a control is submitted under.
pub fn control_name(control: ElementRef<'_>, css: &str) -> Result<String> {
    control
        .value()
        .attr("name")
        .map(str::to_string)
        .ok_or_else(|| ScraperError::ParsingError(format!("Control {} has no name", css)))
}

/// Checks that `control` is a `<select>` offering an option with `value`.
pub fn ensure_option(control: ElementRef<'_>, css: &str, value: &str) -> Result<()> {
    if control.value().name() != "select" {
        return Err(ScraperError::ParsingError(format!(
            "Control {} is a <{}>, not a <select>",
            css,
            control.value().name()
        )));
    }

    if options(control).iter().any(|(v, _)| v == value) {
        Ok(())
    } else {
        Err(ScraperError::OptionNotFound {
            selector: css.to_string(),
            value: value.to_string(),
        })
    }
}

/// The current value of a text input, as the page delivered it.
pub fn input_value(control: ElementRef<'_>) -> String {
    control.value().attr("value").unwrap_or_default().to_string()
}

/// Serializes the form that owns the submit control `submit_css`, the way a
/// browser does when that control is clicked.
///
/// `overrides` replace same-named fields (or are appended) and stand for
/// values the user picked or typed since the page loaded.
pub fn build_submission(
    document: &Html,
    page_url: &Url,
    submit_css: &str,
    overrides: &[(String, String)],
) -> Result<FormSubmission> {
    let submit = find_control(document, submit_css)?;

    let form = submit
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "form")
        .or_else(|| document.select(&selector("form").ok()?).next())
        .ok_or_else(|| ScraperError::ElementNotFound(format!("form owning {}", submit_css)))?;

    let mut fields = collect_fields(form)?;

    for (name, value) in overrides {
        match fields.iter_mut().find(|(n, _)| n == name) {
            Some(field) => field.1 = value.clone(),
            None => fields.push((name.clone(), value.clone())),
        }
    }

    // The activated button is the only submit control that gets sent
    if let Some(name) = submit.value().attr("name") {
        fields.push((name.to_string(), input_value(submit)));
    }

    let action = form.value().attr("action").unwrap_or_default();
    let action = page_url.join(action).map_err(|e| {
        ScraperError::ParsingError(format!("Invalid form action {:?}: {}", action, e))
    })?;

    Ok(FormSubmission { action, fields })
}

/// Successful controls of a form, in document order.
fn collect_fields(form: ElementRef<'_>) -> Result<Vec<(String, String)>> {
    let controls = selector("input, select, textarea")?;
    let mut fields = Vec::new();

    for control in form.select(&controls) {
        let el = control.value();
        let Some(name) = el.attr("name") else {
            continue;
        };
        if el.attr("disabled").is_some() {
            continue;
        }

        let value = match el.name() {
            "select" => {
                let options = options(control);
                let selected = options
                    .iter()
                    .find(|(_, selected)| *selected)
                    .or_else(|| options.first());
                match selected {
                    Some((value, _)) => value.clone(),
                    None => continue,
                }
            }
            "textarea" => control.text().collect::<String>(),
            _ => {
                let kind = el.attr("type").unwrap_or("text").to_ascii_lowercase();
                match kind.as_str() {
                    "submit" | "button" | "image" | "reset" | "file" => continue,
                    "checkbox" | "radio" if el.attr("checked").is_none() => continue,
                    "checkbox" | "radio" => el.attr("value").unwrap_or("on").to_string(),
                    _ => input_value(control),
                }
            }
        };

        fields.push((name.to_string(), value));
    }

    Ok(fields)
}

/// `(value, selected)` for each `<option>` of a `<select>`.
fn options(select: ElementRef<'_>) -> Vec<(String, bool)> {
    let Ok(option) = selector("option") else {
        return Vec::new();
    };

    select
        .select(&option)
        .map(|opt| {
            let value = match opt.value().attr("value") {
                Some(v) => v.to_string(),
                None => opt.text().collect::<String>().trim().to_string(),
            };
            (value, opt.value().attr("selected").is_some())
        })
        .collect()
}
