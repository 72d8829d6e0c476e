fn main() -> anyhow::Result<()> {
    rdf_parser_jsonld_cli::run()
}
