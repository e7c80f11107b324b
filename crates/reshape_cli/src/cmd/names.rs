use reshape::conv::Result;
use reshape::conv::name::{to_camel, to_class_name, to_snake, words};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	#[arg(required = true)]
	pub names: Vec<String>,
	#[arg(long)]
	pub json: bool,
}

/// Print the words and case forms of each name.
pub fn run(args: Args) -> Result<()> {
	let rows: Vec<NameJson> = args
		.names
		.iter()
		.map(|name| NameJson {
			name: name.clone(),
			words: words(name).into_iter().map(str::to_owned).collect(),
			snake: to_snake(name),
			camel: to_camel(name),
			class: to_class_name(name),
		})
		.collect();

	if args.json {
		emit_json(&rows);
		return Ok(());
	}

	println!("name\tsnake\tcamel\tclass\twords");
	for row in &rows {
		println!("{}\t{}\t{}\t{}\t{}", row.name, row.snake, row.camel, row.class, row.words.join(" "));
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct NameJson {
	name: String,
	words: Vec<String>,
	snake: String,
	camel: String,
	class: String,
}
