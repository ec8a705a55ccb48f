use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let hx_attribute = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        hx_attribute, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {hx_attribute:?}"
    );
}

/// Find the control called `name`, e.g. an input, select or textarea.
#[track_caller]
pub(crate) fn must_get_control<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    let selector = Selector::parse(&format!("[name=\"{name}\"]")).unwrap();

    form.select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No form control found with name \"{name}\""))
}

/// Assert that the form has a required input called `name` of type `type_`.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = must_get_control(form, name);
    let input_type = input.value().attr("type").unwrap_or_default();

    assert_eq!(
        input_type, type_,
        "want input {name} with type \"{type_}\", got {input_type:?}"
    );
    assert!(
        input.value().attr("required").is_some(),
        "want input with name {name} to have the required attribute but got none"
    );
}

/// Assert that the input called `name` holds `value`.
#[track_caller]
pub(crate) fn assert_form_input_with_value(form: &ElementRef<'_>, name: &str, value: &str) {
    let input = must_get_control(form, name);
    let input_value = input.value().attr("value").unwrap_or_default();

    assert_eq!(
        input_value, value,
        "want input {name} with value \"{value}\", got {input_value:?}"
    );
}

/// The value of the selected option of the select called `name`.
#[track_caller]
pub(crate) fn selected_option(form: &ElementRef<'_>, name: &str) -> Option<String> {
    let select = must_get_control(form, name);

    select
        .select(&Selector::parse("option[selected]").unwrap())
        .next()
        .and_then(|option| option.value().attr("value"))
        .map(ToOwned::to_owned)
}

#[track_caller]
pub(crate) fn assert_form_submit_button(form: &ElementRef<'_>) {
    let submit_button = form
        .select(&Selector::parse("button[type=submit]").unwrap())
        .next()
        .expect("No submit button found");

    assert!(
        !submit_button.text().collect::<String>().trim().is_empty(),
        "want submit button with a label"
    );
}
