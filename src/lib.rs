//! blueprint-lens: analyze Camel Blueprint integration descriptors.
//!
//! The pipeline is pure and synchronous: raw text is parsed into a tolerant
//! element tree for fact extraction, scanned independently for external
//! services, and the results can then be budgeted into a bounded payload for
//! a summarization model.

pub mod budget;
pub mod cli;
pub mod config;
pub mod detect;
pub mod domain;
pub mod extract;
pub mod fetch;
pub mod parse;
pub mod redact;
pub mod render;
pub mod utils;

use domain::BlueprintAnalysis;
use extract::EndpointTable;

/// Run extraction and detection over one document.
///
/// Never fails: malformed input yields partial or empty facts.
pub fn analyze(service_name: &str, raw: &str, table: &EndpointTable) -> BlueprintAnalysis {
    let doc = parse::parse(raw);
    let facts = extract::extract_facts(&doc, table);
    let external_services = detect::detect_external_services(raw);

    BlueprintAnalysis {
        service_name: service_name.to_string(),
        routes: facts.routes,
        dependencies: facts.dependencies,
        data_sources: facts.data_sources,
        properties: facts.properties,
        external_services,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<blueprint xmlns="http://www.osgi.org/xmlns/blueprint/v1.0.0"
           xmlns:cm="http://aries.apache.org/blueprint/xmlns/blueprint-cm/v1.1.0"
           xmlns:cxf="http://camel.apache.org/schema/blueprint/cxf">
  <cm:property-placeholder persistent-id="com.acme.orders">
    <cm:default-properties>
      <cm:property name="partner.endpoint" value="https://partner.example.com/ws"/>
    </cm:default-properties>
  </cm:property-placeholder>

  <bean id="ordersDs" class="org.apache.commons.dbcp2.BasicDataSource">
    <property name="url" value="jdbc:postgresql://db.internal:5432/orders"/>
  </bean>
  <bean id="orderProcessor" class="com.acme.orders.OrderProcessor"/>

  <cxf:cxfEndpoint id="partnerSoap" address="[{partner.endpoint}]"/>
  <cxf:cxfEndpoint id="ordersService" address="/orders"/>

  <camelContext id="orders" xmlns="http://camel.apache.org/schema/blueprint">
    <route id="receiveOrder">
      <from uri="cxf:bean:ordersService"/>
      <to uri="direct:process"/>
    </route>
    <route id="processOrder">
      <from uri="direct:process"/>
      <bean ref="orderProcessor" method="handle"/>
      <to uri="cxf:bean:partnerSoap"/>
    </route>
  </camelContext>
</blueprint>"#;

    #[test]
    fn end_to_end_analysis() {
        let analysis = analyze("orders", ORDERS, &EndpointTable::builtin());
        assert_eq!(analysis.service_name, "orders");

        let route_ids: Vec<_> = analysis.routes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(route_ids, vec!["receiveOrder", "processOrder"]);
        assert_eq!(analysis.routes[0].protocol, "SOAP");
        assert_eq!(analysis.routes[1].protocol, "Direct");

        assert_eq!(analysis.data_sources.len(), 1);
        assert_eq!(analysis.data_sources[0].kind, "PostgreSQL");
        assert_eq!(analysis.properties.len(), 1);

        assert_eq!(analysis.external_services.len(), 1);
        let partner = &analysis.external_services[0];
        assert_eq!(partner.name, "partnerSoap");
        assert_eq!(partner.config_property.as_deref(), Some("partner.endpoint"));
    }

    #[test]
    fn analysis_is_deterministic() {
        let table = EndpointTable::builtin();
        assert_eq!(analyze("orders", ORDERS, &table), analyze("orders", ORDERS, &table));
    }

    #[test]
    fn garbage_input_is_empty_not_an_error() {
        let analysis = analyze("junk", "<<< not a blueprint", &EndpointTable::builtin());
        assert!(analysis.is_empty());
    }
}
