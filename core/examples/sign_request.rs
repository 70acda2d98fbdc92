use duo_hmac_core::{Credential, Parameters, Result, Signer, UncheckedHeaders};

fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let signer = Signer::new(Credential::new(
        "DIABCDEFGHIJKLMNOPQR",
        "testtesttesttesttesttesttesttesttesttest",
        "api-xxxxxxxx.duosecurity.com",
    ));

    let mut params = Parameters::new();
    params
        .insert("username", "root")
        .insert("groups", vec!["admins", "users"]);
    let headers = UncheckedHeaders::from_iter([("User-Agent", "duo-hmac-example")]);

    for method in ["GET", "POST"] {
        let components =
            signer.get_authentication_components(method, "/admin/v1/users", Some(&params), Some(&headers))?;

        println!("{method} https://{}", components.uri);
        for (k, v) in components.headers.iter() {
            println!("  {k}: {v}");
        }
        if let Some(body) = &components.body {
            println!("  body: {body}");
        }
    }

    Ok(())
}
