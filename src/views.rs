use axum::{http::StatusCode, response::Html};
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::recipes::{
    form::{RecipeFormValues, DESCRIPTION, IMAGE, INGREDIENTS, INSTRUCTIONS, TITLE},
    model::{Recipe, RecipeSummary},
};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} · Recipe Box</title>
</head>
<body>
<nav><a href="/">Home</a> | <a href="/gallery">Gallery</a> | <a href="/read">Recipes</a> | <a href="/create">Add a recipe</a></nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    ))
}

pub fn home_page() -> Html<String> {
    layout(
        "Home",
        r#"<h1>Recipe Box</h1>
<p>Keep your recipes in one place. <a href="/read">Browse recipes</a> or <a href="/create">add a new one</a>.</p>"#,
    )
}

pub fn gallery_page() -> Html<String> {
    layout(
        "Gallery",
        r#"<h1>Gallery</h1>
<p>Pictures of dishes live alongside their recipes. <a href="/read">See all recipes</a>.</p>"#,
    )
}

pub fn read_page(recipes: &[RecipeSummary]) -> Html<String> {
    let mut body = String::from("<h1>Recipes</h1>\n");
    if recipes.is_empty() {
        body.push_str(r#"<p>No recipes yet. <a href="/create">Add the first one</a>.</p>"#);
        return layout("Recipes", &body);
    }
    for r in recipes {
        body.push_str(&recipe_card(r));
    }
    layout("Recipes", &body)
}

fn recipe_card(r: &RecipeSummary) -> String {
    let image = if r.has_image {
        format!(
            "<img src=\"/recipes/{id}/image\" alt=\"{alt}\">\n",
            id = r.id,
            alt = escape(r.image_name.as_deref().unwrap_or_default()),
        )
    } else {
        String::new()
    };
    format!(
        r#"<article>
<h2>{title}</h2>
<p class="meta">Added {created}</p>
{image}<p>{description}</p>
<h3>Ingredients</h3>
<pre>{ingredients}</pre>
<h3>Instructions</h3>
<pre>{instructions}</pre>
<p><a href="/edit/{id}">Edit</a> | <a href="/delete/{id}">Delete</a></p>
</article>
"#,
        title = escape(&r.title),
        created = r.created_at.format(&Rfc3339).unwrap_or_default(),
        description = escape(&r.description),
        ingredients = escape(&r.ingredients),
        instructions = escape(&r.instructions),
        id = r.id,
    )
}

fn recipe_form(action: &str, submit: &str, v: &RecipeFormValues) -> String {
    let current_image = match &v.image_name {
        Some(name) => format!(
            "<p>Current image: {}. Leave the file empty to keep it.</p>\n",
            escape(name)
        ),
        None => String::new(),
    };
    format!(
        r#"<form method="post" action="{action}" enctype="multipart/form-data">
<label>Title <input type="text" name="{TITLE}" value="{title}" required></label>
<label>Description <textarea name="{DESCRIPTION}" required>{description}</textarea></label>
<label>Ingredients <textarea name="{INGREDIENTS}" required>{ingredients}</textarea></label>
<label>Instructions <textarea name="{INSTRUCTIONS}" required>{instructions}</textarea></label>
{current_image}<label>Image <input type="file" name="{IMAGE}" accept="image/*"></label>
<button type="submit">{submit}</button>
</form>"#,
        action = escape(action),
        title = escape(&v.title),
        description = escape(&v.description),
        ingredients = escape(&v.ingredients),
        instructions = escape(&v.instructions),
    )
}

pub fn create_page() -> Html<String> {
    let form = recipe_form("/create", "Save recipe", &RecipeFormValues::default());
    layout("Add a recipe", &format!("<h1>Add a recipe</h1>\n{form}"))
}

pub fn edit_page(id: Uuid, values: &RecipeFormValues) -> Html<String> {
    let form = recipe_form(&format!("/edit/{id}"), "Save changes", values);
    layout(
        "Edit recipe",
        &format!("<h1>Edit {}</h1>\n{form}", escape(&values.title)),
    )
}

pub fn delete_confirm_page(recipe: &Recipe) -> Html<String> {
    layout(
        "Delete recipe",
        &format!(
            r#"<h1>Delete {title}?</h1>
<p>This cannot be undone.</p>
<form method="post" action="/delete/{id}">
<button type="submit">Delete</button> <a href="/read">Cancel</a>
</form>"#,
            title = escape(&recipe.title),
            id = recipe.id,
        ),
    )
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    layout(
        "Error",
        &format!(
            "<h1>{code} {reason}</h1>\n<p class=\"error\">{message}</p>\n<p><a href=\"/read\">Back to recipes</a></p>",
            code = status.as_u16(),
            reason = status.canonical_reason().unwrap_or("Error"),
            message = escape(message),
        ),
    )
}
