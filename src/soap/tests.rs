//! Tests for the SOAP module

use super::*;
use crate::error::Error;
use crate::http::HttpClient;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ns1="urn:Magento" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:SOAP-ENC="http://schemas.xmlsoap.org/soap/encoding/">
  <SOAP-ENV:Body>{body}</SOAP-ENV:Body>
</SOAP-ENV:Envelope>"#
    )
}

fn fault(code: &str, message: &str) -> String {
    envelope(&format!(
        "<SOAP-ENV:Fault><faultcode>{code}</faultcode><faultstring>{message}</faultstring></SOAP-ENV:Fault>"
    ))
}

const WSDL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns:typens="urn:Magento" xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
    xmlns="http://schemas.xmlsoap.org/wsdl/" name="Magento" targetNamespace="urn:Magento">
  <portType name="PortType">
    <operation name="login"><documentation>Login user</documentation></operation>
    <operation name="salesOrderList"><documentation>List orders</documentation></operation>
    <operation name="salesOrderInfo"><documentation>Order info</documentation></operation>
  </portType>
  <binding name="Binding" type="typens:PortType">
    <soap:binding style="rpc" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="login">
      <soap:operation soapAction="urn:Action"/>
    </operation>
    <operation name="salesOrderList">
      <soap:operation soapAction="urn:SalesList"/>
    </operation>
    <operation name="salesOrderInfo">
      <soap:operation soapAction=""/>
    </operation>
  </binding>
  <service name="MagentoService">
    <port name="Port" binding="typens:Binding">
      <soap:address location="https://shop.example.com/index.php/api/v2_soap/index/"/>
    </port>
  </service>
</definitions>"#;

// ============================================================================
// Envelope Tests
// ============================================================================

#[test]
fn test_encode_login_request() {
    let xml = encode_request(
        "urn:Magento",
        "login",
        &[
            ("username", SoapValue::text("api")),
            ("apiKey", SoapValue::text("p&<q>")),
        ],
    );

    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains(r#"xmlns:ns1="urn:Magento""#));
    assert!(xml.contains(
        "<ns1:login><username>api</username><apiKey>p&amp;&lt;q&gt;</apiKey></ns1:login>"
    ));
}

#[test]
fn test_encode_nested_struct_and_array() {
    let filters = SoapValue::structure([(
        "complex_filter",
        SoapValue::array([SoapValue::structure([
            ("key", SoapValue::text("created_at")),
            (
                "value",
                SoapValue::structure([
                    ("key", SoapValue::text("from")),
                    ("value", SoapValue::text("2024-01-01")),
                ]),
            ),
        ])]),
    )]);

    let xml = encode_request("urn:Magento", "salesOrderList", &[("filters", filters)]);

    assert!(xml.contains(
        "<filters><complex_filter><item><key>created_at</key><value><key>from</key><value>2024-01-01</value></value></item></complex_filter></filters>"
    ));
}

#[test]
fn test_soap_value_from_str() {
    assert_eq!(SoapValue::from("x"), SoapValue::Text("x".to_string()));
    assert_eq!(
        SoapValue::from("y".to_string()),
        SoapValue::Text("y".to_string())
    );
}

// ============================================================================
// Decoder Tests
// ============================================================================

#[test]
fn test_xml_to_value_strips_prefixes_and_keeps_text() {
    let value = xml_to_value(
        r#"<ns1:root xmlns:ns1="urn:x"><ns1:price>19.99</ns1:price><qty>2</qty></ns1:root>"#,
    )
    .unwrap();

    assert_eq!(value, json!({"root": {"price": "19.99", "qty": "2"}}));
}

#[test]
fn test_xml_to_value_arrays() {
    let value = xml_to_value(
        r#"<root xmlns:SOAP-ENC="http://schemas.xmlsoap.org/soap/encoding/">
            <empty SOAP-ENC:arrayType="ns1:entity[0]"/>
            <single><item><id>1</id></item></single>
            <tag>a</tag>
            <tag>b</tag>
        </root>"#,
    )
    .unwrap();

    assert_eq!(value["root"]["empty"], json!([]));
    assert_eq!(value["root"]["single"], json!([{"id": "1"}]));
    assert_eq!(value["root"]["tag"], json!(["a", "b"]));
}

#[test]
fn test_xml_to_value_nil_and_empty() {
    let value = xml_to_value(
        r#"<root xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
            <telephone xsi:nil="true"/>
            <fax></fax>
            <company/>
        </root>"#,
    )
    .unwrap();

    assert_eq!(value["root"]["telephone"], json!(null));
    assert_eq!(value["root"]["fax"], json!(""));
    assert_eq!(value["root"]["company"], json!(""));
}

#[test]
fn test_xml_to_value_unescapes_entities_and_keeps_newlines() {
    let value =
        xml_to_value("<root><street>Main &amp; 1st\nBuilding B</street></root>").unwrap();
    assert_eq!(value["root"]["street"], json!("Main & 1st\nBuilding B"));
}

#[test]
fn test_xml_to_value_cdata() {
    let value = xml_to_value("<root><name><![CDATA[<b>Mug</b>]]></name></root>").unwrap();
    assert_eq!(value["root"]["name"], json!("<b>Mug</b>"));
}

#[test]
fn test_xml_to_value_malformed() {
    let err = xml_to_value("<root><a></b></root>").unwrap_err();
    assert!(matches!(err, Error::XmlParse { .. }));

    let err = xml_to_value("<root><a>").unwrap_err();
    assert!(matches!(err, Error::XmlParse { .. }));
}

#[test]
fn test_decode_login_response() {
    let body = envelope(
        r#"<ns1:loginResponse><loginReturn xsi:type="xsd:string">abc123</loginReturn></ns1:loginResponse>"#,
    );
    assert_eq!(decode_response(&body).unwrap(), json!("abc123"));
}

#[test]
fn test_decode_empty_list_response() {
    let body = envelope(
        r#"<ns1:salesOrderListResponse><result SOAP-ENC:arrayType="ns1:salesOrderListEntity[0]" xsi:type="ns1:salesOrderListEntityArray"/></ns1:salesOrderListResponse>"#,
    );
    assert_eq!(decode_response(&body).unwrap(), json!([]));
}

#[test]
fn test_decode_empty_list_typed_without_array_type() {
    let body = envelope(
        r#"<ns1:salesOrderListResponse><result xsi:type="ns1:salesOrderListEntityArray"/></ns1:salesOrderListResponse>"#,
    );
    assert_eq!(decode_response(&body).unwrap(), json!([]));

    let body = envelope(
        r#"<ns1:salesOrderListResponse><result xsi:type="ns1:salesOrderListEntityArray">
        </result></ns1:salesOrderListResponse>"#,
    );
    assert_eq!(decode_response(&body).unwrap(), json!([]));
}

#[test]
fn test_xml_to_value_keeps_leaf_whitespace() {
    let value = xml_to_value(
        "<root>\n  <telephone> +31 20 555 0100 </telephone>\n  <street>  Main 1  \n</street>\n</root>",
    )
    .unwrap();

    assert_eq!(
        value,
        json!({"root": {"telephone": " +31 20 555 0100 ", "street": "  Main 1  \n"}})
    );
}

#[test]
fn test_decode_list_response_preserves_order() {
    let body = envelope(
        r#"<ns1:salesOrderListResponse><result SOAP-ENC:arrayType="ns1:salesOrderListEntity[2]">
            <item><increment_id>100000002</increment_id></item>
            <item><increment_id>100000001</increment_id></item>
        </result></ns1:salesOrderListResponse>"#,
    );

    assert_eq!(
        decode_response(&body).unwrap(),
        json!([{"increment_id": "100000002"}, {"increment_id": "100000001"}])
    );
}

#[test]
fn test_decode_fault() {
    let err = decode_response(&fault("2", "Access denied.")).unwrap_err();
    match err {
        Error::SoapFault { code, message } => {
            assert_eq!(code, "2");
            assert_eq!(message, "Access denied.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_decode_empty_body() {
    let err = decode_response("  ").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_decode_not_an_envelope() {
    let err = decode_response("<html><body>Maintenance</body></html>").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

// ============================================================================
// WSDL Tests
// ============================================================================

#[test]
fn test_wsdl_parse() {
    let wsdl = WsdlDescriptor::parse(WSDL).unwrap();

    assert_eq!(
        wsdl.endpoint,
        "https://shop.example.com/index.php/api/v2_soap/index/"
    );
    assert_eq!(wsdl.namespace, "urn:Magento");
    assert!(wsdl.has_operation("login"));
    assert!(wsdl.has_operation("salesOrderList"));
    assert!(wsdl.has_operation("salesOrderInfo"));
    assert!(!wsdl.has_operation("catalogProductList"));
    assert_eq!(wsdl.soap_action("login"), "urn:Action");
    assert_eq!(wsdl.soap_action("salesOrderList"), "urn:SalesList");
    // Empty action falls back to the default
    assert_eq!(wsdl.soap_action("salesOrderInfo"), DEFAULT_SOAP_ACTION);
    assert_eq!(wsdl.soap_action("unknown"), DEFAULT_SOAP_ACTION);
}

#[test]
fn test_wsdl_require_operations() {
    let wsdl = WsdlDescriptor::parse(WSDL).unwrap();
    assert!(wsdl.require_operations(&["login", "salesOrderList"]).is_ok());

    let err = wsdl
        .require_operations(&["login", "catalogProductList"])
        .unwrap_err();
    assert!(err.to_string().contains("catalogProductList"));
}

#[test]
fn test_wsdl_without_address() {
    let err = WsdlDescriptor::parse(r#"<definitions name="x"><portType/></definitions>"#)
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_wsdl_default_namespace() {
    let wsdl = WsdlDescriptor::parse(
        r#"<definitions><service><port><address location="http://h/soap"/></port></service></definitions>"#,
    )
    .unwrap();
    assert_eq!(wsdl.namespace, DEFAULT_NAMESPACE);
    assert_eq!(wsdl.endpoint, "http://h/soap");
}

// ============================================================================
// Service Tests
// ============================================================================

fn service_for(server: &MockServer) -> SoapService {
    let wsdl = WsdlDescriptor::new(format!("{}/soap", server.uri()), "urn:Magento")
        .with_operation("login", Some("urn:Action".to_string()));
    SoapService::new(HttpClient::new().unwrap(), wsdl)
}

#[tokio::test]
async fn test_service_load() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.php/api/v2_soap"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WSDL))
        .mount(&mock_server)
        .await;

    let service = SoapService::load(
        HttpClient::new().unwrap(),
        &format!("{}/index.php/api/v2_soap?wsdl", mock_server.uri()),
    )
    .await
    .unwrap();

    assert!(service.wsdl().has_operation("salesOrderInfo"));
}

#[tokio::test]
async fn test_service_load_empty_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&mock_server)
        .await;

    let err = SoapService::load(HttpClient::new().unwrap(), &mock_server.uri())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_service_call_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/soap"))
        .and(header("SOAPAction", "\"urn:Action\""))
        .and(body_string_contains("<username>api</username>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "<ns1:loginResponse><loginReturn>sess-1</loginReturn></ns1:loginResponse>",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let value = service
        .call(
            "login",
            &[("username", "api".into()), ("apiKey", "key".into())],
        )
        .await
        .unwrap();

    assert_eq!(value, json!("sess-1"));
}

#[tokio::test]
async fn test_service_call_fault_with_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(fault("5", "Session expired.")))
        .mount(&mock_server)
        .await;

    let err = service_for(&mock_server)
        .call("salesOrderList", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SoapFault { ref code, .. } if code == "5"));
}

#[tokio::test]
async fn test_service_call_http_error_without_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let err = service_for(&mock_server)
        .call("salesOrderList", &[])
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "Service Unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_service_call_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let err = service_for(&mock_server)
        .call("salesOrderInfo", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}
