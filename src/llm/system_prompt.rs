//! Operation prompts for wayfind LLM calls.
//!
//! Two operations talk to the model: query interpretation (the primary path)
//! and bare-term tag mapping (fallback path only). Each prompt embeds the
//! exact JSON contract the pipeline strict-parses against; the model is told
//! to emit JSON only, and anything else fails parsing and triggers the
//! deterministic fallback.

use crate::models::UserPosition;

/// System prompt for interpreting a free-text query into a structured intent.
///
/// The output contract mirrors [`crate::models::QueryIntent`]: `searchTerm`
/// is the only required field, and every optional field must be omitted
/// rather than guessed when the query gives no evidence for it.
pub const INTERPRET_QUERY_PROMPT: &str = r#"<operation_mode>query_interpretation</operation_mode>

<task>
Interpret a natural-language place search query into a structured search intent.
Extract the core subject, any geographic scoping, any filters, and up to three
OpenStreetMap tags that describe the kind of place sought.
</task>

<output_format>
Respond with a single JSON object and nothing else:
{
  "searchTerm": "core subject of the search (required)",
  "location": {
    "type": "current" | "area" | "coordinates",
    "coordinates": {"latitude": float, "longitude": float},
    "area": "named area, e.g. 'downtown Oslo'",
    "radius": float (kilometers)
  },
  "filters": {
    "openNow": boolean,
    "priceRange": "budget" | "moderate" | "upscale" | "luxury",
    "rating": float (0.0-5.0),
    "cuisine": ["cuisine", ...],
    "amenities": ["amenity", ...],
    "distance": {"value": float, "unit": "miles" | "kilometers"}
  },
  "osmTags": [{"key": "string", "value": "string"}]
}
</output_format>

<rules>
- "searchTerm" is required; keep it short and geocodable ("Italian restaurants", not the whole query).
- Use location.type "current" when the query says "near me", "nearby", "around here", or similar.
- Only include fields the query actually implies. Never invent coordinates.
- osmTags must be real OpenStreetMap key=value pairs (amenity, cuisine, shop, leisure, tourism).
- Emit raw JSON. No markdown fences, no commentary.
</rules>"#;

/// System prompt for mapping a bare term to a single OSM tag.
///
/// Used only when interpretation failed and the fallback intent wants a
/// best-effort tag for its term.
pub const TAG_MAPPING_PROMPT: &str = r#"<operation_mode>tag_mapping</operation_mode>

<task>
Map a bare place-search term to the single best-matching OpenStreetMap tag.
</task>

<output_format>
Respond with a single JSON object and nothing else:
{"key": "string", "value": "string"}
</output_format>

<rules>
- Prefer the most specific applicable key: cuisine for food styles, amenity
  for facility kinds, shop for retail, leisure and tourism otherwise.
- Values are lowercase OSM vocabulary ("italian", "cafe", "supermarket").
- If no tag fits, respond {"key": "amenity", "value": ""} and nothing else.
- Emit raw JSON. No markdown fences, no commentary.
</rules>"#;

/// Builds the user message for a query-interpretation call.
///
/// When the caller position is known it is included so the model can resolve
/// "near me" phrasing; the model is still required to use `type: "current"`
/// rather than copying the coordinates.
#[must_use]
pub fn build_interpret_user_message(text: &str, position: Option<UserPosition>) -> String {
    position.map_or_else(
        || format!("Query:\n{text}"),
        |p| {
            format!(
                "Query:\n{text}\n\nCaller position: latitude {:.6}, longitude {:.6}",
                p.latitude, p.longitude
            )
        },
    )
}
