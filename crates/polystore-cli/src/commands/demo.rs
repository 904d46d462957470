//! Dual-store demo command

use clap::Args;
use polystore_core::config::{resolve, Profile};
use polystore_core::logging::{self, LogProfile};
use polystore_engine::{demo, Engine};

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Properties file to load (key=value lines)
    #[arg(long)]
    pub config: Option<String>,
}

pub fn execute(args: DemoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let raw = super::load_config(args.config.as_deref())?;
    let descriptor = resolve(&raw)?;

    let log_profile = match descriptor.profile {
        Profile::Development => LogProfile::Development,
        Profile::Production => LogProfile::Production,
    };
    logging::init(log_profile);

    let engine = Engine::open(&descriptor)?;
    let report = demo::run(&engine)?;

    println!("Customers found with find_all():");
    println!("-------------------------------");
    for customer in &report.customers {
        println!("{:?}", customer);
    }
    println!();

    if let Some(customer) = &report.customer_one {
        println!("Customer found with find_by_id(1):");
        println!("--------------------------------");
        println!("{:?}", customer);
        println!();
    }

    println!("Customers found with find_by_last_name(\"Bauer\"):");
    println!("--------------------------------------------");
    for customer in &report.bauer_customers {
        println!("{:?}", customer);
    }
    println!();

    println!("People found with find_all():");
    println!("----------------------------");
    for person in &report.people {
        println!("{:?}", person);
    }
    println!();

    println!("People found with find_by_name(\"Jack Bauer\"):");
    println!("-----------------------------------------");
    for person in &report.jack_people {
        println!("{:?}", person);
    }

    Ok(())
}
