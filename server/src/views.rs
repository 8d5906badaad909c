//! HTML rendering for the todo pages.
//!
//! Templates are compiled into the binary and registered with a single
//! `Tera` instance at startup. Names end in `.html`, so Tera autoescapes
//! every interpolated value, including todo content.

use tera::{Context, Tera};
use todo_core::{Todo, TodoView};

const TEMPLATES: &[(&str, &str)] = &[
    ("index.html", include_str!("../templates/index.html")),
    ("todos.html", include_str!("../templates/todos.html")),
    ("todo.html", include_str!("../templates/todo.html")),
    ("todo_edit.html", include_str!("../templates/todo_edit.html")),
];

#[derive(Debug)]
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    pub fn index(&self) -> tera::Result<String> {
        self.tera.render("index.html", &Context::new())
    }

    pub fn todos(&self, todos: &[Todo]) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("todos", todos);
        self.tera.render("todos.html", &context)
    }

    pub fn todo(&self, todo: &Todo, view: TodoView) -> tera::Result<String> {
        let template = match view {
            TodoView::Display => "todo.html",
            TodoView::Edit => "todo_edit.html",
        };
        let mut context = Context::new();
        context.insert("todo", todo);
        self.tera.render(template, &context)
    }
}
