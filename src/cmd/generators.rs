use mock_synth::catalog::Param;
use mock_synth::GeneratorCatalog;
use schemars::JsonSchema;
use serde::Serialize;

/// JSON output for the generators command
#[derive(Serialize, JsonSchema)]
pub(crate) struct GeneratorsJsonOutput {
    generators: Vec<GeneratorInfo>,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct GeneratorInfo {
    name: String,
    /// Schema keys the generator honours besides `fakerParams`
    accepts: Vec<String>,
}

fn param_keys(param: Param) -> &'static [&'static str] {
    match param {
        Param::Bounds => &["min", "max"],
        Param::Length => &["length", "minLength", "maxLength"],
        Param::Affix => &["prefix", "suffix"],
        Param::Casing => &["casing"],
    }
}

pub fn run(json: bool) -> anyhow::Result<()> {
    let catalog = GeneratorCatalog::global();
    let generators: Vec<GeneratorInfo> = catalog
        .names()
        .into_iter()
        .map(|name| GeneratorInfo {
            name: name.to_string(),
            accepts: catalog
                .accepts(name)
                .unwrap_or_default()
                .iter()
                .flat_map(|p| param_keys(*p).iter().map(|k| k.to_string()))
                .collect(),
        })
        .collect();

    if json {
        let out = GeneratorsJsonOutput { generators };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let mut current_namespace = "";
    for info in &generators {
        let namespace = info.name.split('.').next().unwrap_or_default();
        if namespace != current_namespace {
            println!("{}", namespace);
            current_namespace = namespace;
        }
        if info.accepts.is_empty() {
            println!("  {}", info.name);
        } else {
            println!("  {:<28} {}", info.name, info.accepts.join(", "));
        }
    }

    Ok(())
}
