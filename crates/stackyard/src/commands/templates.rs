use colored::Colorize;
use stackyard_core::{CASSANDRA_DEFAULT_VERSION, CASSANDRA_IMAGE, REDIS_DEFAULT_VERSION, REDIS_IMAGE, Template};

pub fn handle() {
    println!("{}", "利用可能なテンプレート:".bold());
    for template in Template::ALL {
        let image = match template {
            Template::Redis => format!("{}:{}", REDIS_IMAGE, REDIS_DEFAULT_VERSION),
            Template::Cassandra => format!("{}:{}", CASSANDRA_IMAGE, CASSANDRA_DEFAULT_VERSION),
        };
        println!(
            "  • {:<10} {} ({})",
            template.as_str().cyan(),
            template.description(),
            image.dimmed()
        );
    }
}
