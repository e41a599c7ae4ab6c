pub const QUERY_RULES: &str = "\
- Only use tables and columns that actually exist in this schema.
- Always join tables in this exact order: artists -> albums -> tracks.
- Use these join conditions:
  * artists.artist_id = albums.artist_id
  * albums.album_id = tracks.album_id
- Always give descriptive aliases to columns selected from different tables
  (e.g. artist_name, album_title, track_title).
- Do NOT use Markdown formatting, code fences, or triple backticks.
- Return only the SQL query that answers the question, with no commentary.";

pub fn build_query_prompt(schema_text: &str, question: &str) -> String {
    format!(
        "You are an expert SQL assistant for a SQLite music database.\n\
         Here is the schema of the database:\n\
         {}\n\n\
         IMPORTANT RULES:\n\
         {}\n\n\
         Question: {}\n\
         SQL:",
        schema_text,
        QUERY_RULES,
        question.trim()
    )
}
