//! Route table for `stay routes` and the startup banner

pub const ROUTES: &[(&str, &str, &str)] = &[
    // Pages
    ("GET", "/", "Landing page"),
    ("GET", "/predict", "Intake wizard"),
    ("GET", "/results", "Result viewer (opens a fresh analysis)"),

    // Wizard actions
    ("POST", "/predict/type", "Select property type"),
    ("POST", "/predict/address", "Edit address"),
    ("POST", "/predict/suggestion", "Pick an address suggestion"),
    ("POST", "/predict/capacity", "Set bedrooms, bathrooms or guests"),
    ("POST", "/predict/amenity", "Toggle an amenity"),
    ("POST", "/predict/next", "Advance to the next step"),
    ("POST", "/predict/back", "Return to the previous step"),
    ("POST", "/predict/submit", "Submit the draft"),

    // HTMX partials
    ("GET", "/htmx/suggestions", "Address suggestion list"),
    ("GET", "/htmx/results", "Result viewer panel"),
    ("POST", "/results/report", "Report download"),

    // API
    ("GET", "/api/health", "Health check"),
    ("GET", "/api/results", "Result viewer phase JSON"),

    // Static assets
    ("GET", "/static/style.css", "CSS stylesheet"),
];

/// Print all routes
pub fn print_routes() {
    println!("\nStay Web Routes:");
    println!("{:-<60}", "");
    for (method, path, desc) in ROUTES {
        println!("{:6} {:24} {}", method, path, desc);
    }
    println!();
}
