//! Person commands
//!
//! Usage:
//!   peopledb person add --first <NAME> --last <NAME> --dob <RFC3339> [options]
//!   peopledb person show <ID> [--json]
//!   peopledb person list [--json]
//!   peopledb person count
//!   peopledb person delete <ID>...
//!   peopledb person set-salary <ID> <AMOUNT>

use chrono::{DateTime, FixedOffset};
use clap::{Args, Subcommand};
use peopledb_core::model::{Address, Person, Region};
use peopledb_store::{db, schema, PeopleRepository, SqliteStore};
use rust_decimal::Decimal;
use std::path::Path;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Args)]
pub struct PersonArgs {
    #[command(subcommand)]
    pub command: PersonCommand,
}

#[derive(Debug, Subcommand)]
pub enum PersonCommand {
    /// Save a new person (with addresses, spouse link and parent link)
    Add(AddArgs),
    /// Show one person with addresses, spouse and children
    Show(ShowArgs),
    /// List every person
    List(ListArgs),
    /// Print the number of stored people
    Count,
    /// Delete one or more people by id
    Delete(DeleteArgs),
    /// Replace a person's salary
    SetSalary(SetSalaryArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub first: String,

    #[arg(long)]
    pub last: String,

    /// Date of birth with offset, e.g. 1980-11-15T15:15:00-06:00
    #[arg(long, value_parser = parse_dob)]
    pub dob: DateTime<FixedOffset>,

    #[arg(long)]
    pub salary: Option<Decimal>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long, requires_all = ["home_city", "home_state", "home_postcode", "home_country", "home_region"])]
    pub home_street: Option<String>,
    #[arg(long, requires = "home_street")]
    pub home_city: Option<String>,
    #[arg(long, requires = "home_street")]
    pub home_state: Option<String>,
    #[arg(long, requires = "home_street")]
    pub home_postcode: Option<String>,
    #[arg(long, requires = "home_street")]
    pub home_country: Option<String>,
    #[arg(long, requires = "home_street")]
    pub home_region: Option<Region>,

    #[arg(long, requires_all = ["business_city", "business_state", "business_postcode", "business_country", "business_region"])]
    pub business_street: Option<String>,
    #[arg(long, requires = "business_street")]
    pub business_city: Option<String>,
    #[arg(long, requires = "business_street")]
    pub business_state: Option<String>,
    #[arg(long, requires = "business_street")]
    pub business_postcode: Option<String>,
    #[arg(long, requires = "business_street")]
    pub business_country: Option<String>,
    #[arg(long, requires = "business_street")]
    pub business_region: Option<Region>,

    /// Link an existing person as spouse
    #[arg(long)]
    pub spouse: Option<i64>,

    /// Record an existing person as parent
    #[arg(long)]
    pub parent: Option<i64>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: i64,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[arg(required = true)]
    pub ids: Vec<i64>,
}

#[derive(Debug, Args)]
pub struct SetSalaryArgs {
    pub id: i64,
    pub amount: Decimal,
}

fn parse_dob(text: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(text).map_err(|e| format!("invalid RFC 3339 date '{text}': {e}"))
}

/// Execute person command
pub fn execute(db_path: &Path, args: PersonArgs) -> CliResult {
    let conn = db::open(db_path)?;
    schema::apply_schema(&conn)?;
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store)?;

    match args.command {
        PersonCommand::Add(add_args) => execute_add(&repo, add_args),
        PersonCommand::Show(show_args) => execute_show(&repo, show_args),
        PersonCommand::List(list_args) => execute_list(&repo, list_args),
        PersonCommand::Count => {
            println!("{}", repo.count()?);
            Ok(())
        }
        PersonCommand::Delete(delete_args) => execute_delete(&repo, delete_args),
        PersonCommand::SetSalary(salary_args) => execute_set_salary(&repo, salary_args),
    }
}

fn address_from_parts(
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
    region: Option<Region>,
) -> Option<Address> {
    Some(Address::new(street?, city?, state?, postcode?, country?, region?))
}

fn find_existing(repo: &PeopleRepository<'_>, id: i64) -> Result<Person, Box<dyn std::error::Error>> {
    repo.find_by_id(id)?
        .ok_or_else(|| format!("person {id} not found").into())
}

fn execute_add(repo: &PeopleRepository<'_>, args: AddArgs) -> CliResult {
    let mut person = Person::new(args.first, args.last, args.dob);
    person.salary = args.salary;
    person.email = args.email;
    person.home_address = address_from_parts(
        args.home_street,
        args.home_city,
        args.home_state,
        args.home_postcode,
        args.home_country,
        args.home_region,
    );
    person.business_address = address_from_parts(
        args.business_street,
        args.business_city,
        args.business_state,
        args.business_postcode,
        args.business_country,
        args.business_region,
    );
    if let Some(spouse_id) = args.spouse {
        person.spouse = Some(Box::new(find_existing(repo, spouse_id)?));
    }
    if let Some(parent_id) = args.parent {
        find_existing(repo, parent_id)?;
        person.parent_id = Some(parent_id);
    }

    let saved = repo.save(person)?;
    match saved.id() {
        Some(id) => println!("{id}"),
        None => return Err("save returned no id".into()),
    }
    Ok(())
}

fn describe_address(address: &Address) -> String {
    let mut line = address.street_address.clone();
    if let Some(address2) = &address.address2 {
        line.push_str(", ");
        line.push_str(address2);
    }
    format!(
        "{}, {}, {} {}, {} ({})",
        line, address.city, address.state, address.postcode, address.country, address.region
    )
}

fn headline(person: &Person) -> String {
    format!(
        "#{} {} {}",
        person.id().map_or_else(|| "?".to_string(), |id| id.to_string()),
        person.first_name,
        person.last_name
    )
}

fn print_person(person: &Person) {
    println!("{}, born {}", headline(person), person.dob_utc().to_rfc3339());
    if let Some(salary) = &person.salary {
        println!("  salary: {salary}");
    }
    if let Some(email) = &person.email {
        println!("  email: {email}");
    }
    if let Some(home) = &person.home_address {
        println!("  home: {}", describe_address(home));
    }
    if let Some(business) = &person.business_address {
        println!("  business: {}", describe_address(business));
    }
    if let Some(spouse) = &person.spouse {
        println!("  spouse: {}", headline(spouse));
    }
    if !person.children.is_empty() {
        let children: Vec<String> = person.children.iter().map(headline).collect();
        println!("  children: {}", children.join(", "));
    }
}

fn execute_show(repo: &PeopleRepository<'_>, args: ShowArgs) -> CliResult {
    let person = find_existing(repo, args.id)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&person)?);
    } else {
        print_person(&person);
    }
    Ok(())
}

fn execute_list(repo: &PeopleRepository<'_>, args: ListArgs) -> CliResult {
    let people = repo.find_all()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&people)?);
    } else {
        for person in &people {
            println!("{}, born {}", headline(person), person.dob_utc().to_rfc3339());
        }
    }
    Ok(())
}

fn execute_delete(repo: &PeopleRepository<'_>, args: DeleteArgs) -> CliResult {
    let people = args
        .ids
        .iter()
        .map(|&id| find_existing(repo, id))
        .collect::<Result<Vec<_>, _>>()?;

    let deleted = match people.as_slice() {
        [one] => repo.delete(one)?,
        many => repo.delete_many(many)?,
    };
    println!("Deleted {deleted}");
    Ok(())
}

fn execute_set_salary(repo: &PeopleRepository<'_>, args: SetSalaryArgs) -> CliResult {
    let mut person = find_existing(repo, args.id)?;
    person.salary = Some(args.amount);
    repo.update(&person)?;
    println!("Updated salary of {} to {}", headline(&person), args.amount);
    Ok(())
}
