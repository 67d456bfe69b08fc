use super::*;

#[test]
fn bare_token_becomes_session_cookie() {
    assert_eq!(cookie_pair(" abc.def "), "access_token=abc.def");
}

#[test]
fn full_pair_is_kept() {
    assert_eq!(cookie_pair("refresh_token=xyz"), "refresh_token=xyz");
}

#[test]
fn methods_map_one_to_one() {
    assert_eq!(reqwest_method(Method::Get), reqwest::Method::GET);
    assert_eq!(reqwest_method(Method::Patch), reqwest::Method::PATCH);
    assert_eq!(reqwest_method(Method::Delete), reqwest::Method::DELETE);
}

#[test]
fn seeded_cookie_is_sent_to_backend_origin() {
    let config = ClientConfig::default().with_base_url("http://127.0.0.1:3000");
    let transport = ReqwestTransport::new(config, Some("abc")).unwrap();
    assert_eq!(transport.cookies().as_deref(), Some("access_token=abc"));
}

#[test]
fn empty_jar_has_no_cookie_header() {
    let transport = ReqwestTransport::new(ClientConfig::default(), None).unwrap();
    assert_eq!(transport.cookies(), None);
}
