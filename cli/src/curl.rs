use duo_hmac_core::{AuthenticationComponents, Error, Parameters, Result, UncheckedHeaders};

/// Parse `KEY=VALUE` items into string parameters.
///
/// Only the first `=` splits an item, so values may contain `=`.
pub fn parse_params<I, S>(items: I) -> Result<Parameters>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut params = Parameters::new();
    for item in items {
        let item = item.as_ref();
        let Some((k, v)) = item.split_once('=') else {
            return Err(Error::config_invalid(format!(
                "parameter {item:?} is not in KEY=VALUE form"
            )));
        };
        params.insert(k, v);
    }

    Ok(params)
}

/// Parse `Name: value` lines into caller headers.
///
/// Lines are not checked here; a malformed line is rejected when the
/// request is signed.
pub fn parse_headers<I, S>(items: I) -> UncheckedHeaders
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut headers = UncheckedHeaders::new();
    for item in items {
        headers.insert_line(item.as_ref());
    }

    headers
}

/// Render the components as a curl command line.
///
/// ```text
/// curl -X <METHOD> -H "<name>: <value>"... [-d '<body>'] https://<uri>
/// ```
pub fn curl_command(method: &str, components: &AuthenticationComponents) -> String {
    let mut args = vec![
        "curl".to_string(),
        "-X".to_string(),
        method.to_uppercase(),
    ];

    for (k, v) in components.headers.iter() {
        args.push(format!("-H \"{k}: {v}\""));
    }
    if let Some(body) = &components.body {
        args.push(format!("-d '{body}'"));
    }
    args.push(format!("https://{}", components.uri));

    args.join(" ")
}
