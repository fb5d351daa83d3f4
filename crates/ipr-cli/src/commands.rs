use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use ipr_formats::dag_json::to_json;
use ipr_formats::{DagJsonFormat, Format};
use ipr_resolver::{PutOptions, Resolver, TreeOptions};
use ipr_store::FsBlockStore;
use ipr_types::{Cid, CodecId, HashAlg, Ipld};
use serde_json::json;
use tracing::debug;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let resolver = open_resolver(&config)?;
    let out = cli.format;
    match cli.command {
        Command::Put(args) => cmd_put(&resolver, &config, args, out),
        Command::Get(args) => cmd_get(&resolver, args, out),
        Command::Resolve(args) => cmd_resolve(&resolver, args, out),
        Command::Tree(args) => cmd_tree(&resolver, args, out),
        Command::Rm(args) => cmd_rm(&resolver, args, out),
    }
}

fn open_resolver(config: &CliConfig) -> anyhow::Result<Resolver> {
    let store = FsBlockStore::open(&config.store_path)
        .with_context(|| format!("opening block store {}", config.store_path.display()))?
        .with_verification(config.verify_on_read);
    debug!(root = %config.store_path.display(), "opened block store");
    Ok(Resolver::with_bundled_formats(Arc::new(store)))
}

fn parse_cid(text: &str) -> anyhow::Result<Cid> {
    text.trim()
        .parse::<Cid>()
        .with_context(|| format!("invalid CID {text:?}"))
}

/// Splits `<cid>/<path>` at the first slash.
fn split_target(target: &str) -> (&str, &str) {
    let target = target.trim_start_matches("/ipfs/");
    target.split_once('/').unwrap_or((target, ""))
}

fn read_node(input: &str) -> anyhow::Result<Ipld> {
    let text = if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        text
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {input}"))?
    };
    DagJsonFormat
        .deserialize(text.as_bytes())
        .context("input is not valid DAG-JSON")
}

fn render(node: &Ipld) -> anyhow::Result<serde_json::Value> {
    to_json(node).context("node cannot be shown as DAG-JSON")
}

fn cmd_put(
    resolver: &Resolver,
    config: &CliConfig,
    args: PutArgs,
    out: OutputFormat,
) -> anyhow::Result<()> {
    let node = read_node(&args.input)?;
    let codec = match &args.codec {
        Some(name) => name.parse::<CodecId>()?,
        None => config.default_codec,
    };
    let hash_alg = match &args.hash {
        Some(name) => Some(name.parse::<HashAlg>()?),
        None => config.hash_alg,
    };
    let options = PutOptions {
        hash_alg,
        cid_version: args.cid_version.unwrap_or(config.cid_version),
        only_hash: args.only_hash,
    };

    let cid = resolver
        .put([node], codec, options)
        .next()
        .context("no CID produced")??;

    match out {
        OutputFormat::Json => {
            println!("{}", json!({ "cid": cid.to_string(), "stored": !args.only_hash }));
        }
        OutputFormat::Text if args.only_hash => {
            println!("{} {}", cid.to_string().yellow(), "(not stored)".dimmed());
        }
        OutputFormat::Text => {
            println!("{} {}", "✓".green().bold(), cid.to_string().yellow());
        }
    }
    Ok(())
}

fn cmd_get(resolver: &Resolver, args: GetArgs, out: OutputFormat) -> anyhow::Result<()> {
    let cids = args
        .cids
        .iter()
        .map(|s| parse_cid(s))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut rendered = Vec::with_capacity(cids.len());
    for (cid, node) in cids.iter().zip(resolver.get(cids.clone())) {
        let node = node.with_context(|| format!("reading {cid}"))?;
        let value = render(&node)?;
        match out {
            OutputFormat::Json => rendered.push(json!({ "cid": cid.to_string(), "node": value })),
            OutputFormat::Text => {
                println!("{}", cid.to_string().yellow().bold());
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
        }
    }
    if out == OutputFormat::Json {
        println!("{}", serde_json::Value::Array(rendered));
    }
    Ok(())
}

fn cmd_resolve(resolver: &Resolver, args: ResolveArgs, out: OutputFormat) -> anyhow::Result<()> {
    let (cid, path) = split_target(&args.target);
    let steps = resolver.resolve_str(cid, path)?;

    let mut rendered = Vec::new();
    for step in steps {
        let step = step.with_context(|| format!("resolving {}", args.target))?;
        let value = render(&step.value)?;
        match out {
            OutputFormat::Json => {
                rendered.push(json!({ "value": value, "remainder": step.remainder }));
            }
            OutputFormat::Text => {
                let marker = if step.link().is_some() { "→".cyan() } else { "=".green() };
                if step.remainder.is_empty() {
                    println!("{marker} {value}");
                } else {
                    println!("{marker} {value}  {} {}", "remainder:".dimmed(), step.remainder);
                }
            }
        }
    }
    if out == OutputFormat::Json {
        println!("{}", serde_json::Value::Array(rendered));
    }
    Ok(())
}

fn cmd_tree(resolver: &Resolver, args: TreeArgs, out: OutputFormat) -> anyhow::Result<()> {
    let cid = parse_cid(&args.cid)?;
    let options = TreeOptions {
        recursive: args.recursive,
    };

    let mut paths = Vec::new();
    for path in resolver.tree(&cid, &args.offset, options) {
        let path = path.with_context(|| format!("enumerating {cid}"))?;
        match out {
            OutputFormat::Json => paths.push(path),
            OutputFormat::Text => println!("{path}"),
        }
    }
    if out == OutputFormat::Json {
        println!("{}", serde_json::to_string(&paths)?);
    }
    Ok(())
}

fn cmd_rm(resolver: &Resolver, args: RmArgs, out: OutputFormat) -> anyhow::Result<()> {
    let cids = args
        .cids
        .iter()
        .map(|s| parse_cid(s))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut removed = Vec::new();
    let mut removal = resolver.remove(cids);
    while let Some(result) = removal.next() {
        match result {
            Ok(cid) => {
                if out == OutputFormat::Text {
                    println!("{} removed {}", "✓".green(), cid.to_string().yellow());
                }
                removed.push(cid.to_string());
            }
            Err(e) => {
                let skipped = removal.into_remaining().count();
                return Err(anyhow::Error::new(e)
                    .context(format!("removal stopped, {skipped} block(s) not attempted")));
            }
        }
    }
    if out == OutputFormat::Json {
        println!("{}", json!({ "removed": removed }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ipr_store::BlockStore;
    use std::path::Path;

    fn write_config(dir: &Path) -> std::path::PathBuf {
        let config = dir.join("ipr.toml");
        let store = dir.join("blocks");
        std::fs::write(&config, format!("store_path = {:?}\n", store.display().to_string())).unwrap();
        config
    }

    fn run(config: &Path, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["ipr", "--config", config.to_str().unwrap()];
        argv.extend_from_slice(args);
        run_command(Cli::parse_from(argv))
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    #[test]
    fn split_target_at_first_slash() {
        assert_eq!(split_target("bafy/a/b"), ("bafy", "a/b"));
        assert_eq!(split_target("bafy"), ("bafy", ""));
        assert_eq!(split_target("/ipfs/bafy/x"), ("bafy", "x"));
    }

    #[test]
    fn parse_cid_rejects_garbage() {
        assert!(parse_cid("definitely not").is_err());
    }

    #[test]
    fn read_node_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"hello":"world","n":[1,2]}"#).unwrap();

        let node = read_node(path.to_str().unwrap()).unwrap();
        let Ipld::Map(map) = node else {
            panic!("expected map");
        };
        assert_eq!(map["hello"], Ipld::String("world".into()));
    }

    #[test]
    fn read_node_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(read_node(path.to_str().unwrap()).is_err());
    }

    // -----------------------------------------------------------------------
    // Commands against a filesystem store
    // -----------------------------------------------------------------------

    #[test]
    fn put_get_resolve_tree_rm() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path());
        let doc = dir.path().join("doc.json");
        std::fs::write(&doc, r#"{"a":{"b":1},"c":"x"}"#).unwrap();

        run(&config_path, &["put", doc.to_str().unwrap()]).unwrap();

        let config = CliConfig::load(Some(&config_path)).unwrap();
        let resolver = open_resolver(&config).unwrap();
        let node = read_node(doc.to_str().unwrap()).unwrap();
        let cid = resolver
            .put([node], CodecId::DAG_CBOR, PutOptions::only_hash())
            .next()
            .unwrap()
            .unwrap();
        assert!(resolver.store().has(&cid).unwrap());

        let cid_text = cid.to_string();
        run(&config_path, &["get", &cid_text]).unwrap();
        run(&config_path, &["--format", "json", "resolve", &format!("{cid_text}/a/b")]).unwrap();
        run(&config_path, &["tree", &cid_text, "--offset", "a"]).unwrap();
        run(&config_path, &["rm", &cid_text]).unwrap();
        assert!(!resolver.store().has(&cid).unwrap());

        // Already gone.
        assert!(run(&config_path, &["rm", &cid_text]).is_err());
    }

    #[test]
    fn only_hash_leaves_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path());
        let doc = dir.path().join("doc.json");
        std::fs::write(&doc, r#"[1,2,3]"#).unwrap();

        run(&config_path, &["put", doc.to_str().unwrap(), "--only-hash", "--codec", "dag-json"]).unwrap();

        let store = FsBlockStore::open(dir.path().join("blocks")).unwrap();
        assert!(store.all_cids().unwrap().is_empty());
    }

    #[test]
    fn unknown_codec_flag_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path());
        let doc = dir.path().join("doc.json");
        std::fs::write(&doc, "{}").unwrap();

        assert!(run(&config_path, &["put", doc.to_str().unwrap(), "--codec", "nope"]).is_err());
    }
}
