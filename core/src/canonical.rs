// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Canonical string construction.

use std::collections::BTreeMap;

use log::debug;
use percent_encoding::utf8_percent_encode;

use crate::constants::DUO_PARAM_ENCODE_SET;
use crate::hash::hex_sha512;
use crate::header::fold_name;
use crate::header::Headers;
use crate::param::QueryParameters;

/// Construct the canonical string of a request.
///
/// ## Format
///
/// ```text
/// Date (RFC 2822) + "\n" +
/// HTTP method in uppercase + "\n" +
/// API host in lowercase + "\n" +
/// API path + "\n" +
/// Canonicalized query parameters (empty line if none) + "\n" +
/// Hex SHA512 of the body + "\n" +
/// Hex SHA512 of the canonicalized x-duo headers
/// ```
///
/// The field order is part of the protocol.
pub fn canonical_string(
    date: &str,
    method: &str,
    host: &str,
    path: &str,
    params: Option<&QueryParameters>,
    body: Option<&str>,
    x_duo_headers: Option<&Headers>,
) -> String {
    let parts = [
        date.to_string(),
        method.to_uppercase(),
        host.to_lowercase(),
        path.to_string(),
        canonicalize_parameters(params),
        canonicalize_body(body),
        canonicalize_x_duo_headers(x_duo_headers),
    ];

    let s = parts.join("\n");
    debug!("calculated canonical string: {s}");
    s
}

/// Canonicalize query parameters.
///
/// Keys and values are percent encoded the way OAuth 1.0 normalizes
/// parameters ([RFC 5849 section 3.4.1.3.2](https://tools.ietf.org/html/rfc5849#section-3.4.1.3.2)),
/// then `key=value` pairs are sorted by key and value and joined by `&`.
pub fn canonicalize_parameters(params: Option<&QueryParameters>) -> String {
    let Some(params) = params else {
        return String::new();
    };

    let mut pairs: Vec<(String, String)> = params
        .iter()
        .flat_map(|(k, values)| {
            let k = utf8_percent_encode(k, &DUO_PARAM_ENCODE_SET).to_string();
            values.iter().map(move |v| {
                (
                    k.clone(),
                    utf8_percent_encode(v, &DUO_PARAM_ENCODE_SET).to_string(),
                )
            })
        })
        .collect();
    pairs.sort();

    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Hex SHA512 of the body. An absent body hashes like the empty string.
pub fn canonicalize_body(body: Option<&str>) -> String {
    hex_sha512(body.unwrap_or_default().as_bytes())
}

/// Hex SHA512 of the x-duo headers.
///
/// Names are lowercased and sorted, then names and values are joined by NUL
/// characters: `name1 \0 value1 \0 name2 \0 value2`. If two names fold to
/// the same name the later one wins. Only pass the x-duo subset; every
/// given header is hashed.
pub fn canonicalize_x_duo_headers(headers: Option<&Headers>) -> String {
    let lowered: BTreeMap<String, &str> = headers
        .into_iter()
        .flat_map(|h| h.iter())
        .map(|(k, v)| (fold_name(k), v))
        .collect();

    let canon = lowered
        .iter()
        .flat_map(|(k, v)| [k.as_str(), *v])
        .collect::<Vec<_>>()
        .join("\0");

    hex_sha512(canon.as_bytes())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    const DATE: &str = "date_string";
    const HOST: &str = "test.duosecurity.com";
    const PATH: &str = "/test/the/api";
    const EMPTY_STRING_HASH: &str = "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e";
    const EMPTY_JSON_HASH: &str = "27c74670adb75075fad058d5ceaf7b20c4e7786c83bae8a32f626f9782af34c9a33c2046ef60fd2a7878d378e29fec851806bbd9a67878f3a9f1cda4830763fd";

    fn expected_canonical(method: &str, body_hash: &str) -> String {
        format!("{DATE}\n{method}\n{HOST}\n{PATH}\n\n{body_hash}\n{EMPTY_STRING_HASH}")
    }

    fn query(pairs: &[(&str, &[&str])]) -> QueryParameters {
        pairs
            .iter()
            .map(|(k, values)| (*k, values.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_canonical_string_get_no_parameter() {
        let actual = canonical_string(DATE, "GET", HOST, PATH, None, None, None);
        assert_eq!(actual, expected_canonical("GET", EMPTY_STRING_HASH));
    }

    #[test]
    fn test_canonical_string_post_no_parameter() {
        let actual = canonical_string(DATE, "POST", HOST, PATH, None, Some("{}"), None);
        assert_eq!(actual, expected_canonical("POST", EMPTY_JSON_HASH));
    }

    #[test]
    fn test_canonical_string_method_capitalization() {
        let actual = canonical_string(DATE, "get", HOST, PATH, None, None, None);
        assert_eq!(actual, expected_canonical("GET", EMPTY_STRING_HASH));
    }

    #[test]
    fn test_canonical_string_host_capitalization() {
        let actual = canonical_string(DATE, "GET", &HOST.to_uppercase(), PATH, None, None, None);
        assert_eq!(actual, expected_canonical("GET", EMPTY_STRING_HASH));
    }

    #[test]
    fn test_canonical_string_path_verbatim() {
        let actual = canonical_string(DATE, "GET", HOST, "/Test/The/API", None, None, None);
        assert_eq!(actual.lines().nth(3), Some("/Test/The/API"));
    }

    #[test]
    fn test_canonicalize_empty_parameters() {
        assert_eq!(canonicalize_parameters(None), "");
        assert_eq!(canonicalize_parameters(Some(&QueryParameters::new())), "");
    }

    #[test_case(&[("realname", &["First Last"])], "realname=First%20Last"; "one parameter")]
    #[test_case(
        &[("realname", &["First Last"]), ("username", &["root"])],
        "realname=First%20Last&username=root";
        "two parameters"
    )]
    #[test_case(
        &[("words", &["First Last"]), ("success", &["true"]), ("digit", &["5"])],
        "digit=5&success=true&words=First%20Last";
        "mixed type parameters"
    )]
    #[test_case(&[("foo_bar", &["2"]), ("foo", &["1"])], "foo=1&foo_bar=2"; "similar keys")]
    #[test_case(&[("users", &["bob", "alice"])], "users=alice&users=bob"; "sorted values")]
    #[test_case(
        &[
            ("digits", &["0123456789"]),
            ("letters", &["abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ"]),
            ("punctuation", &["!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~"]),
            ("whitespace", &["\t\n\x0b\x0c\r "]),
        ],
        "digits=0123456789&letters=abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ&punctuation=%21%22%23%24%25%26%27%28%29%2A%2B%2C-.%2F%3A%3B%3C%3D%3E%3F%40%5B%5C%5D%5E_%60%7B%7C%7D~&whitespace=%09%0A%0B%0C%0D%20";
        "ascii printable characters"
    )]
    fn test_canonicalize_parameters(input: &[(&str, &[&str])], expected: &str) {
        assert_eq!(canonicalize_parameters(Some(&query(input))), expected);
    }

    #[test]
    fn test_canonicalize_unicode_parameters() {
        let input = query(&[
            (
                "\u{469a}\u{287b}\u{35d0}\u{8ef3}\u{6727}\u{502a}\u{0810}\u{d091}\u{c8}\u{c170}",
                &["\u{0f45}\u{1a76}\u{341a}\u{654c}\u{c23f}\u{9b09}\u{abe2}\u{8343}\u{1b27}\u{60d0}"],
            ),
            (
                "\u{7449}\u{7e4b}\u{ccfb}\u{59ff}\u{fe5f}\u{83b7}\u{adcc}\u{900c}\u{cfd1}\u{7813}",
                &["\u{8db7}\u{5022}\u{92d3}\u{42ef}\u{207d}\u{8730}\u{acfe}\u{5617}\u{0946}\u{4e30}"],
            ),
            (
                "\u{7470}\u{9314}\u{901c}\u{9eae}\u{40d8}\u{4201}\u{82d8}\u{8c70}\u{1d31}\u{a042}",
                &["\u{17d9}\u{0ba8}\u{9358}\u{aadf}\u{a42a}\u{48be}\u{fb96}\u{6fe9}\u{b7ff}\u{32f3}"],
            ),
            (
                "\u{c2c5}\u{2c1d}\u{2620}\u{3617}\u{96b3}F\u{8605}\u{20e8}\u{ac21}\u{5934}",
                &["\u{fba9}\u{41aa}\u{bd83}\u{840b}\u{2615}\u{3e6e}\u{652d}\u{a8b5}\u{d56b}U"],
            ),
        ]);

        assert_eq!(
            canonicalize_parameters(Some(&input)),
            "%E4%9A%9A%E2%A1%BB%E3%97%90%E8%BB%B3%E6%9C%A7%E5%80%AA%E0%A0%90%ED%82%91%C3%88%EC%85%B0=%E0%BD%85%E1%A9%B6%E3%90%9A%E6%95%8C%EC%88%BF%E9%AC%89%EA%AF%A2%E8%8D%83%E1%AC%A7%E6%83%90&%E7%91%89%E7%B9%8B%EC%B3%BB%E5%A7%BF%EF%B9%9F%E8%8E%B7%EA%B7%8C%E9%80%8C%EC%BF%91%E7%A0%93=%E8%B6%B7%E5%80%A2%E9%8B%93%E4%8B%AF%E2%81%BD%E8%9C%B0%EA%B3%BE%E5%98%97%E0%A5%86%E4%B8%B0&%E7%91%B0%E9%8C%94%E9%80%9C%E9%BA%AE%E4%83%98%E4%88%81%E8%8B%98%E8%B1%B0%E1%B4%B1%EA%81%82=%E1%9F%99%E0%AE%A8%E9%8D%98%EA%AB%9F%EA%90%AA%E4%A2%BE%EF%AE%96%E6%BF%A9%EB%9F%BF%E3%8B%B3&%EC%8B%85%E2%B0%9D%E2%98%A0%E3%98%97%E9%9A%B3F%E8%98%85%E2%83%A8%EA%B0%A1%E5%A4%B4=%EF%AE%A9%E4%86%AA%EB%B6%83%E8%90%8B%E2%98%95%E3%B9%AE%E6%94%AD%EA%A2%B5%ED%95%ABU"
        );
    }

    #[test]
    fn test_canonicalize_parameters_order_independent() {
        let keys = ["one", "two", "three", "four", "five", "six", "seven", "eight", "nine"];
        let forward: QueryParameters = keys.iter().map(|k| (*k, vec![k.to_string()])).collect();
        let backward: QueryParameters =
            keys.iter().rev().map(|k| (*k, vec![k.to_string()])).collect();

        assert_eq!(
            canonicalize_parameters(Some(&forward)),
            canonicalize_parameters(Some(&backward))
        );
    }

    #[test]
    fn test_canonicalize_empty_body() {
        assert_eq!(canonicalize_body(None), EMPTY_STRING_HASH);
        assert_eq!(canonicalize_body(Some("")), EMPTY_STRING_HASH);
    }

    #[test_case(
        "I am an ascii string",
        "c1710f1224e4973bfbb9ca1a297e63756a4b1736ebd1b646ba3d63a392b73d24a52ac8b4afb6eafca6dfe91f09e2e75117c377398a7d2f22136b05c038b94151";
        "ascii body"
    )]
    #[test_case(
        "î ❤ ựṉịʗƠΔѤ",
        "b713c8cc2bfe672cf55133d81ca6fa802628c7c8968d444c186434146bcd0275a510d3fd725b0a8132882c4a60d8457420f252f84e4edd00fcf12aa7c4eb2246";
        "unicode body"
    )]
    #[test_case(
        r#"{"foo": "bar", "baz": 1, "nested": {"objects": {"are": {"neat": true}}}}"#,
        "cd97c6ef2f1db6a660f2b7b71235d16902d532e3a4b54afc07acebbf34a265d8f77c344706f3222bcb28009d8c4c5259daa388bddb7dcc1b163982dce6a0c1ec";
        "json body"
    )]
    #[test_case("{}", EMPTY_JSON_HASH; "empty json body")]
    fn test_canonicalize_body(body: &str, expected: &str) {
        assert_eq!(canonicalize_body(Some(body)), expected);
    }

    #[test]
    fn test_canonicalize_empty_headers() {
        assert_eq!(canonicalize_x_duo_headers(None), EMPTY_STRING_HASH);
        assert_eq!(
            canonicalize_x_duo_headers(Some(&Headers::new())),
            EMPTY_STRING_HASH
        );
    }

    #[test]
    fn test_canonicalize_headers_case_insensitive() {
        let headers = Headers::from_iter([("x-duo-A", "header_value_1"), ("X-Duo-B", "header_value_2")]);

        assert_eq!(
            canonicalize_x_duo_headers(Some(&headers)),
            "60be11a30e0756f2ee2afdce1db849b987dcf86c1133394bd7bbbc9877920330c4d78aceacbb377ab8cbd9a8efe6a410fed4047376635ac71226ab46ca10d2b1"
        );
    }

    #[test]
    fn test_canonicalize_headers_order_independent() {
        let keys = [
            "x-duo-one",
            "x-duo-two",
            "x-duo-three",
            "x-duo-four",
            "x-duo-five",
            "x-duo-six",
            "x-duo-seven",
        ];
        let forward = Headers::from_iter(keys.iter().map(|k| (*k, *k)));
        let backward = Headers::from_iter(keys.iter().rev().map(|k| (*k, *k)));

        assert_eq!(
            canonicalize_x_duo_headers(Some(&forward)),
            canonicalize_x_duo_headers(Some(&backward))
        );
    }

    #[test]
    fn test_canonicalize_headers_joined_by_nul() {
        let headers = Headers::from_iter([("X-Duo-Date", "Fri, 24 May 2024 12:00:00 -0000")]);

        assert_eq!(
            canonicalize_x_duo_headers(Some(&headers)),
            hex_sha512(b"x-duo-date\0Fri, 24 May 2024 12:00:00 -0000")
        );
    }
}
