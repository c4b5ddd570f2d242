use super::parameters::CallParameters;

/// Ordered list of parameter names covered by an operation's hash.
pub type HashSpec = &'static [&'static str];

pub const INITIALIZE8_FIELDS: HashSpec = &[
    "accountNumber",
    "purchaseOperation",
    "price",
    "priceArgList",
    "currency",
    "vat",
    "orderID",
    "productNumber",
    "description",
    "clientIPAddress",
    "clientIdentifier",
    "additionalValues",
    "externalID",
    "returnUrl",
    "view",
    "agreementRef",
    "cancelUrl",
    "clientLanguage",
];

pub const COMPLETE_FIELDS: HashSpec = &["accountNumber", "orderRef"];

/// Computes the PxOrder request hash.
///
/// Values of the listed fields are concatenated in `fields` order, trimmed,
/// suffixed with `encryption_key` and MD5-digested. Fields absent from
/// `parameters` are skipped; the remote side does the same, so this must not
/// become an error.
pub fn calculate_hash(
    parameters: &CallParameters,
    fields: &[&str],
    encryption_key: &str,
) -> String {
    let joined: String = fields
        .iter()
        .filter_map(|field| parameters.get(field))
        .map(ToString::to_string)
        .collect();

    let mut input = trim_gateway_whitespace(&joined).to_string();
    input.push_str(encryption_key);

    format!("{:x}", md5::compute(input.as_bytes()))
}

fn trim_gateway_whitespace(s: &str) -> &str {
    s.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}
