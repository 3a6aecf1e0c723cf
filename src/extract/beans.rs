//! Bean, service-reference and data-source extraction.

use super::datasource::{self, CONNECTION_KEYS};
use crate::domain::{DataSource, Dependency, DependencyKind};
use crate::parse::{BlueprintDocument, NodeRef};

const DATA_SOURCE_INTERFACE: &str = "javax.sql.DataSource";

pub fn extract_dependencies(doc: &BlueprintDocument) -> Vec<Dependency> {
    let mut out = Vec::new();
    for node in named_declarations(doc) {
        if node.is("bean") {
            out.push(bean_dependency(node));
        } else {
            out.push(reference_dependency(node));
        }
    }
    out
}

pub fn extract_data_sources(doc: &BlueprintDocument) -> Vec<DataSource> {
    let mut out = Vec::new();
    for node in named_declarations(doc) {
        let Some(name) = node.non_empty_attr("id") else {
            continue;
        };
        if node.is("bean") {
            let class = node.attr("class").unwrap_or("");
            if !datasource::is_data_source_class(class) {
                continue;
            }
            let props = bean_properties(node);
            let connection = props
                .iter()
                .filter(|p| CONNECTION_KEYS.contains(&p.name))
                .filter_map(|p| p.value);
            out.push(DataSource {
                name: name.to_string(),
                kind: datasource::resolve_type(class, connection),
                properties: props.iter().map(BeanProperty::render).collect(),
            });
        } else if is_data_source_reference(node) {
            let kind = node
                .attr("filter")
                .and_then(datasource::vendor_from_connection)
                .unwrap_or("OSGi Service Reference");
            let mut properties = vec![format!("interface={}", DATA_SOURCE_INTERFACE)];
            if let Some(filter) = node.non_empty_attr("filter") {
                properties.push(format!("filter={}", filter));
            }
            out.push(DataSource { name: name.to_string(), kind: kind.to_string(), properties });
        }
    }
    out
}

/// `bean` and OSGi `reference` elements that carry an id, in document order.
fn named_declarations(doc: &BlueprintDocument) -> Vec<NodeRef<'_>> {
    let mut nodes: Vec<NodeRef<'_>> = doc
        .find_all("bean")
        .into_iter()
        .chain(doc.find_all("reference"))
        .filter(|n| n.non_empty_attr("id").is_some())
        .collect();
    nodes.sort_by_key(|n| n.id());
    nodes
}

fn is_data_source_reference(node: NodeRef<'_>) -> bool {
    node.attr("interface").is_some_and(|i| i.trim() == DATA_SOURCE_INTERFACE)
}

fn bean_dependency(node: NodeRef<'_>) -> Dependency {
    let name = node.attr("id").unwrap_or_default().trim().to_string();
    let class = node.non_empty_attr("class");
    let is_database = class.is_some_and(datasource::is_data_source_class);

    let mut description = match class {
        Some(class) => format!("Bean of class {}", class),
        None => "Bean without an explicit class".to_string(),
    };
    if let Some(factory) = node.non_empty_attr("factory-method") {
        match node.non_empty_attr("factory-ref") {
            Some(factory_ref) => {
                description.push_str(&format!(" via {}.{}()", factory_ref, factory))
            }
            None => description.push_str(&format!(" via {}()", factory)),
        }
    }

    Dependency {
        name,
        kind: if is_database { DependencyKind::Database } else { DependencyKind::Service },
        description,
        properties: bean_properties(node).iter().map(BeanProperty::render).collect(),
    }
}

fn reference_dependency(node: NodeRef<'_>) -> Dependency {
    let name = node.attr("id").unwrap_or_default().trim().to_string();
    let interface = node.non_empty_attr("interface").unwrap_or("unspecified interface");
    let mut properties = Vec::new();
    if let Some(filter) = node.non_empty_attr("filter") {
        properties.push(format!("filter={}", filter));
    }
    Dependency {
        name,
        kind: if is_data_source_reference(node) {
            DependencyKind::Database
        } else {
            DependencyKind::Service
        },
        description: format!("OSGi service reference to {}", interface),
        properties,
    }
}

struct BeanProperty<'a> {
    name: &'a str,
    value: Option<&'a str>,
    reference: Option<&'a str>,
}

impl BeanProperty<'_> {
    fn render(&self) -> String {
        match (self.value, self.reference) {
            (Some(value), _) => format!("{}={}", self.name, value),
            (None, Some(reference)) => format!("{} -> {}", self.name, reference),
            (None, None) => self.name.to_string(),
        }
    }
}

/// Direct `property` children; a nested `<value>` element stands in for the
/// `value` attribute.
fn bean_properties(node: NodeRef<'_>) -> Vec<BeanProperty<'_>> {
    node.children()
        .filter(|c| c.is("property"))
        .filter_map(|p| {
            let name = p.non_empty_attr("name")?;
            let value = p.attr("value").or_else(|| p.first_child("value").map(|v| v.text()));
            Some(BeanProperty { name, value, reference: p.non_empty_attr("ref") })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    const XML: &str = r#"<blueprint>
  <bean id="orderService" class="com.acme.OrderService" init-method="start">
    <property name="timeout" value="30"/>
    <property name="dataSource" ref="ordersDs"/>
  </bean>
  <bean id="ordersDs" class="com.zaxxer.hikari.HikariDataSource">
    <property name="jdbcUrl" value="jdbc:postgresql://db:5432/orders"/>
    <property name="username"><value>svc</value></property>
  </bean>
  <bean id="legacyDs" class="org.apache.commons.dbcp2.BasicDataSource">
    <property name="url" value="{{legacy.url}}"/>
  </bean>
  <bean id="mapper" class="com.acme.Mapper" factory-ref="mapperFactory" factory-method="create"/>
  <bean class="com.acme.Anonymous"/>
  <reference id="sharedDs" interface="javax.sql.DataSource" filter="(osgi.jdbc.driver.class=oracle.jdbc.OracleDriver)"/>
  <reference id="audit" interface="com.acme.AuditService"/>
</blueprint>"#;

    #[test]
    fn dependencies_cover_named_beans_and_references_in_order() {
        let deps = extract_dependencies(&parse(XML));
        let names: Vec<_> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["orderService", "ordersDs", "legacyDs", "mapper", "sharedDs", "audit"]);

        assert_eq!(deps[0].kind, DependencyKind::Service);
        assert_eq!(deps[0].description, "Bean of class com.acme.OrderService");
        assert_eq!(deps[0].properties, vec!["timeout=30", "dataSource -> ordersDs"]);

        assert_eq!(deps[1].kind, DependencyKind::Database);
        assert_eq!(deps[3].description, "Bean of class com.acme.Mapper via mapperFactory.create()");
        assert_eq!(deps[4].kind, DependencyKind::Database);
        assert_eq!(deps[5].description, "OSGi service reference to com.acme.AuditService");
    }

    #[test]
    fn data_sources_prefer_vendor_over_pool_family() {
        let sources = extract_data_sources(&parse(XML));
        let kinds: Vec<_> = sources.iter().map(|d| (d.name.as_str(), d.kind.as_str())).collect();
        assert_eq!(
            kinds,
            vec![("ordersDs", "PostgreSQL"), ("legacyDs", "Apache DBCP"), ("sharedDs", "Oracle")]
        );
        assert_eq!(
            sources[0].properties,
            vec!["jdbcUrl=jdbc:postgresql://db:5432/orders", "username=svc"]
        );
    }

    #[test]
    fn malformed_document_yields_partial_lists() {
        let deps = extract_dependencies(&parse(r#"<blueprint><bean id="a" class="X"><property name="p" value="1"/"#));
        assert_eq!(deps.len(), 1);
        assert!(deps[0].properties.is_empty());
    }
}
