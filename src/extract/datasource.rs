//! Data-source typing.
//!
//! Two stages: the declaring class names a connection-pool family, then a
//! connection URL or driver class names the database vendor. The vendor is
//! more specific and always wins when present.

/// (class-name fragment, pool family)
const POOL_FAMILIES: &[(&str, &str)] = &[
    ("HikariDataSource", "HikariCP"),
    ("BasicDataSource", "Apache DBCP"),
    ("ComboPooledDataSource", "C3P0"),
    ("org.apache.tomcat.jdbc.pool", "Tomcat JDBC Pool"),
    ("DriverManagerDataSource", "Spring DriverManager"),
];

/// (lower-cased URL or driver fragment, vendor)
const VENDORS: &[(&str, &str)] = &[
    ("jdbc:mysql", "MySQL"),
    ("jdbc:mariadb", "MySQL"),
    ("com.mysql", "MySQL"),
    ("jdbc:postgresql", "PostgreSQL"),
    ("org.postgresql", "PostgreSQL"),
    ("jdbc:oracle", "Oracle"),
    ("oracle.jdbc", "Oracle"),
    ("jdbc:sqlserver", "SQL Server"),
    ("com.microsoft.sqlserver", "SQL Server"),
    ("jdbc:h2", "H2"),
    ("org.h2", "H2"),
    ("jdbc:derby", "Derby"),
    ("org.apache.derby", "Derby"),
    ("jdbc:db2", "DB2"),
    ("com.ibm.db2", "DB2"),
];

/// Property names that carry a connection URL or driver class.
pub const CONNECTION_KEYS: &[&str] =
    &["url", "jdbcUrl", "URL", "databaseUrl", "driverClassName", "driverClass"];

/// Whether a bean class declares a connection factory.
pub fn is_data_source_class(class: &str) -> bool {
    class.contains("DataSource") || pool_family(class).is_some()
}

fn pool_family(class: &str) -> Option<&'static str> {
    POOL_FAMILIES.iter().find(|(fragment, _)| class.contains(fragment)).map(|(_, family)| *family)
}

/// Stage one: pool family from the class name.
pub fn type_from_class(class: &str) -> &'static str {
    match pool_family(class) {
        Some(family) => family,
        None if class.contains("DataSource") => "Generic DataSource",
        None => "Unknown",
    }
}

/// Stage two: vendor from a connection URL or driver class name.
pub fn vendor_from_connection(value: &str) -> Option<&'static str> {
    let lower = value.to_ascii_lowercase();
    VENDORS.iter().find(|(fragment, _)| lower.contains(fragment)).map(|(_, vendor)| *vendor)
}

/// Resolve the data-source type from the class and any connection values.
pub fn resolve_type<'a>(class: &str, connection_values: impl IntoIterator<Item = &'a str>) -> String {
    connection_values
        .into_iter()
        .find_map(vendor_from_connection)
        .unwrap_or_else(|| type_from_class(class))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_name_detection() {
        assert_eq!(type_from_class("com.zaxxer.hikari.HikariDataSource"), "HikariCP");
        assert_eq!(type_from_class("org.apache.commons.dbcp2.BasicDataSource"), "Apache DBCP");
        assert_eq!(type_from_class("com.mchange.v2.c3p0.ComboPooledDataSource"), "C3P0");
        assert_eq!(type_from_class("org.apache.tomcat.jdbc.pool.DataSource"), "Tomcat JDBC Pool");
        assert_eq!(type_from_class("com.acme.RoutingDataSource"), "Generic DataSource");
        assert_eq!(type_from_class("com.acme.Thing"), "Unknown");
    }

    #[test]
    fn vendor_detection_covers_urls_and_drivers() {
        assert_eq!(vendor_from_connection("jdbc:mysql://db:3306/app"), Some("MySQL"));
        assert_eq!(vendor_from_connection("org.postgresql.Driver"), Some("PostgreSQL"));
        assert_eq!(vendor_from_connection("jdbc:oracle:thin:@db:1521:orcl"), Some("Oracle"));
        assert_eq!(
            vendor_from_connection("com.microsoft.sqlserver.jdbc.SQLServerDriver"),
            Some("SQL Server")
        );
        assert_eq!(vendor_from_connection("jdbc:h2:mem:test"), Some("H2"));
        assert_eq!(vendor_from_connection("org.apache.derby.jdbc.ClientDriver"), Some("Derby"));
        assert_eq!(vendor_from_connection("jdbc:db2://db:50000/app"), Some("DB2"));
        assert_eq!(vendor_from_connection("{{db.url}}"), None);
    }

    #[test]
    fn vendor_beats_pool_family() {
        assert_eq!(
            resolve_type("com.zaxxer.hikari.HikariDataSource", ["jdbc:postgresql://db/app"]),
            "PostgreSQL"
        );
        assert_eq!(resolve_type("com.zaxxer.hikari.HikariDataSource", ["{{db.url}}"]), "HikariCP");
        assert_eq!(resolve_type("com.acme.Pool", []), "Unknown");
    }
}
