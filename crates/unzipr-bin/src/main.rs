use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use tracing_subscriber::{fmt, EnvFilter};
use unzipr::{
    IndicatifProgressReporter, ProgressReporter, RecursiveExtractor, RecursiveExtractorBuilder,
    DEFAULT_MAX_DEPTH,
};

/// Unpack a zip archive next to itself, together with every zip archive nested
/// inside it. Nested archives are removed once they have been unpacked.
#[derive(Debug, Parser)]
#[command(name = "unzipr", version, about)]
struct Opt {
    /// The top-level archive to extract
    archive: PathBuf,

    /// How many archives may be nested inside each other
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Do not limit how deep archives may be nested
    #[arg(long, conflicts_with = "max_depth")]
    no_max_depth: bool,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

impl Opt {
    fn max_depth(&self) -> Option<usize> {
        (!self.no_max_depth).then_some(self.max_depth)
    }
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();

    let env_filter = EnvFilter::builder()
        .with_default_directive(opt.verbose.tracing_level_filter().into())
        .from_env_lossy();
    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let builder = RecursiveExtractorBuilder::new().with_max_depth(opt.max_depth());
    if opt.verbose.is_silent() {
        run(&builder.build(), &opt)
    } else {
        let reporter = IndicatifProgressReporter::with_default_style();
        let result = run(&builder.with_progress_reporter(&reporter).build(), &opt);
        if result.is_err() {
            reporter.progress_bar().abandon();
        }
        result
    }
}

fn run<P: ProgressReporter>(extractor: &RecursiveExtractor<P>, opt: &Opt) -> anyhow::Result<()> {
    tracing::debug!(max_depth = ?extractor.max_depth(), "starting extraction");
    extractor.extract(&opt.archive).map_err(|err| {
        let kind = err.kind();
        anyhow::Error::new(err).context(format!(
            "{kind}: failed to extract {}",
            opt.archive.display()
        ))
    })
}
