//! Demonstrates building the reference ontology and serializing it as a bundle.
//!
//! Run with: `cargo run --example dump_sample -p ui-ontology`

fn main() {
    let ontology = ui_ontology::Ontology::sample();

    println!("Reference ontology v{}", ontology.version);
    println!("  Entities:       {}", ontology.entities.len());
    println!("  Fields:         {}", ontology.field_count());
    println!("  Relationships:  {}", ontology.relationships.len());
    println!("  State machines: {}", ontology.state_machines.len());
    println!("  Operations:     {}", ontology.operations.len());
    println!();

    for entity in &ontology.entities {
        let lifecycle = ontology
            .state_machines
            .get(&entity.name)
            .map_or(0, |m| m.transitions.len());
        println!(
            "  {:14} {:>2} fields, {:>2} states, {:>2} operations",
            entity.name,
            entity.fields.len(),
            lifecycle,
            ontology.operations_for(&entity.name).count(),
        );
    }

    println!();

    // Serialize the bundle (show first 200 chars).
    let json_str =
        serde_json::to_string_pretty(&ontology).unwrap_or_else(|e| format!("JSON error: {e}"));
    println!("Bundle output ({} bytes):", json_str.len());
    let preview_end = json_str
        .char_indices()
        .nth(200)
        .map_or(json_str.len(), |(i, _)| i);
    println!("{}...", &json_str[..preview_end]);
}
