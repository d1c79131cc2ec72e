//! Conversor de linha de comando: lê um documento NAF e grava o CAS/XMI
//! correspondente. Toda a lógica de conversão mora no crate `naf-core`;
//! aqui ficam só argumentos, arquivos e logging.

use std::path::PathBuf;
use std::sync::mpsc;

use clap::Parser;
use naf_core::{convert_streaming, NafDocument, XmiDocument};
use tracing::{info, warn};

#[derive(Parser)]
#[command(version, about = "Converte documentos NAF (NLP Annotation Format) em CAS/XMI")]
struct Cli {
    /// Arquivo NAF de entrada
    #[arg(required_unless_present = "demo")]
    input: Option<PathBuf>,

    /// Arquivo de saída (padrão: entrada com a extensão trocada por .xmi.xml)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Converte as amostras embutidas e imprime o XMI na saída padrão
    #[arg(long)]
    demo: bool,

    /// Imprime os eventos da conversão como JSON, uma linha por evento
    #[arg(long)]
    events: bool,
}

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        warn!("a conversão falhou: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> naf_core::Result<()> {
    if cli.demo {
        return run_demo(cli.events);
    }

    // required_unless_present garante que input existe fora do modo demo.
    let input = match cli.input {
        Some(input) => input,
        None => return Ok(()),
    };
    let output = cli
        .output
        .unwrap_or_else(|| input.with_extension("xmi.xml"));

    info!("lendo {}", input.display());
    let naf = NafDocument::from_file(&input)?;
    let out = convert_and_report(&naf, cli.events)?;

    std::fs::write(&output, out.to_xml_string())?;
    info!(
        "{} elementos gravados em {}",
        out.len(),
        output.display()
    );
    Ok(())
}

/// Converte as amostras embutidas, útil para inspecionar o formato de saída
/// sem precisar de um arquivo NAF em mãos.
fn run_demo(events: bool) -> naf_core::Result<()> {
    for (name, xml) in naf_core::samples::demo_documents() {
        info!("convertendo amostra '{name}'");
        let naf = NafDocument::parse(xml)?;
        let out = convert_and_report(&naf, events)?;
        println!("{}", out.to_xml_string());
    }
    Ok(())
}

/// Executa a conversão e, se pedido, imprime os eventos coletados ao final
/// (inclusive o evento de erro, quando a conversão falha).
fn convert_and_report(naf: &NafDocument, events: bool) -> naf_core::Result<XmiDocument> {
    let (tx, rx) = mpsc::channel();
    let result = convert_streaming(naf, &tx);
    drop(tx);
    if events {
        for event in rx.try_iter() {
            if let Ok(json) = serde_json::to_string(&event) {
                println!("{json}");
            }
        }
    }
    result
}
