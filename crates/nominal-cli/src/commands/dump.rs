//! `nominal dump`: every declared type with its edges.

use std::fmt::Write;
use std::path::PathBuf;

use nominal_core::{ExplicitInstance, ParamDef};
use nominal_lib::{TypeDef, TypeHierarchy};
use serde::Serialize;

use super::run_common::load_or_exit;

pub struct DumpArgs {
    pub hierarchy: PathBuf,
    pub json: bool,
}

pub fn run(args: DumpArgs) {
    let hierarchy = load_or_exit(&args.hierarchy);

    if !args.json {
        print!("{}", render_dump(&hierarchy));
        return;
    }

    match serde_json::to_string_pretty(&dump_entries(&hierarchy)) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// JSON shape of one declared type. Ancestors and descendants exclude the type itself.
#[derive(Debug, Serialize)]
pub struct DumpEntry<'a> {
    pub name: &'a str,
    pub params: &'a [ParamDef],
    pub parents: Vec<&'a ExplicitInstance>,
    pub ancestors: Vec<&'a ExplicitInstance>,
    pub descendants: Vec<&'a str>,
}

pub fn dump_entries(hierarchy: &TypeHierarchy) -> Vec<DumpEntry<'_>> {
    let names: Vec<&str> = hierarchy.type_defs().map(TypeDef::name).collect();

    hierarchy
        .type_defs()
        .map(|def| DumpEntry {
            name: def.name(),
            params: def.params(),
            parents: def.parents().map(|(_, inst)| inst).collect(),
            ancestors: def
                .ancestors()
                .filter(|&(id, _)| id != def.id())
                .map(|(_, inst)| inst)
                .collect(),
            descendants: def
                .descendants()
                .filter(|&id| id != def.id())
                .map(|id| names[id.index()])
                .collect(),
        })
        .collect()
}

/// Text listing in declaration order; empty sections are omitted.
pub fn render_dump(hierarchy: &TypeHierarchy) -> String {
    let mut out = String::new();

    for entry in dump_entries(hierarchy) {
        let header = hierarchy
            .type_def(entry.name)
            .map_or_else(|| entry.name.to_owned(), |def| def.instance().to_string());
        let _ = writeln!(out, "{header}");

        let params: Vec<String> = entry
            .params
            .iter()
            .map(|p| format!("{} {}", p.name, p.variance))
            .collect();
        write_section(&mut out, "params", &params);
        write_section(&mut out, "parents", &display_all(&entry.parents));
        write_section(&mut out, "ancestors", &display_all(&entry.ancestors));
        write_section(&mut out, "descendants", &entry.descendants);
    }

    out
}

fn display_all(instances: &[&ExplicitInstance]) -> Vec<String> {
    instances.iter().map(|inst| inst.to_string()).collect()
}

fn write_section<S: AsRef<str>>(out: &mut String, label: &str, items: &[S]) {
    if items.is_empty() {
        return;
    }
    let items: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    let _ = writeln!(out, "  {label}: {}", items.join(", "));
}
