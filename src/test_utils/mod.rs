#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod state;

pub(crate) use form::{
    assert_form_input, assert_form_input_with_value, assert_form_submit_button,
    assert_hx_endpoint, must_get_form, selected_option,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, select_text};
pub(crate) use http::{assert_hx_redirect, get_header};
pub(crate) use state::{get_test_app_state, get_test_ledger};
