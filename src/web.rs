use crate::encoding::EncodingTables;
use crate::error::ReportError;
use crate::features::FEATURE_LABELS;
use crate::model::{ModelKind, ModelRegistry};
use crate::report::{build_report, RangePolicy, ReportRequest, Submission};
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use serde::Serialize;
use std::net::SocketAddr;

#[derive(Serialize)]
struct FormSchema {
    models: Vec<&'static str>,
    categories: EncodingTables,
    features: Vec<&'static str>,
}

// Full pipeline for one submission
async fn create_report(
    req: web::Json<ReportRequest>,
    registry: web::Data<ModelRegistry>,
    policy: web::Data<RangePolicy>,
) -> Result<HttpResponse, ReportError> {
    let submission = Submission::prepare(req.into_inner(), *policy.get_ref())?;
    let report = build_report(&registry, &submission)?;
    Ok(HttpResponse::Ok().json(report))
}

// Chart data as a CSV download
async fn export_features(
    req: web::Json<ReportRequest>,
    policy: web::Data<RangePolicy>,
) -> Result<HttpResponse, ReportError> {
    let submission = Submission::prepare(req.into_inner(), *policy.get_ref())?;
    let body = submission.features.to_csv()?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"profile_features.csv\"",
        ))
        .body(body))
}

async fn get_schema() -> HttpResponse {
    let schema = FormSchema {
        models: ModelKind::ALL.iter().map(|kind| kind.as_str()).collect(),
        categories: EncodingTables::new(),
        features: FEATURE_LABELS.to_vec(),
    };
    HttpResponse::Ok().json(schema)
}

async fn get_model_info(registry: web::Data<ModelRegistry>) -> HttpResponse {
    HttpResponse::Ok().json(registry.info())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("Student Performance Analyzer is running!")
}

async fn serve_homepage() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(HOMEPAGE)
}

/// Registers every route; shared by the server and the HTTP tests.
fn json_config() -> web::JsonConfig {
    // Undecodable bodies answer with the same JSON error shape as the handlers.
    web::JsonConfig::default()
        .error_handler(|err, _req| ReportError::InvalidBody(err.to_string()).into())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(serve_homepage))
        .route("/health", web::get().to(health_check))
        .route("/schema", web::get().to(get_schema))
        .route("/model/info", web::get().to(get_model_info))
        .route("/report", web::post().to(create_report))
        .route("/report/features.csv", web::post().to(export_features));
}

pub async fn start_api(
    registry: ModelRegistry,
    policy: RangePolicy,
    addr: SocketAddr,
) -> std::io::Result<()> {
    let registry = web::Data::new(registry);
    let policy = web::Data::new(policy);

    tracing::info!(%addr, "starting Student Performance Analyzer");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(registry.clone())
            .app_data(policy.clone())
            .configure(configure)
    })
    .bind(addr)?
    .run()
    .await
}

const HOMEPAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Student Performance Analyzer</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 0; display: flex; }
        aside { width: 220px; background: #f0f2f6; padding: 20px; min-height: 100vh; }
        main { flex: 1; padding: 20px 40px; }
        .columns { display: grid; grid-template-columns: repeat(3, 1fr); gap: 30px; }
        .form-group { margin: 14px 0; }
        label { display: block; margin-bottom: 5px; font-weight: bold; }
        select, input[type=number] { width: 100%; padding: 8px; border: 1px solid #ddd; border-radius: 4px; }
        input[type=range] { width: 85%; }
        .radio-row label { display: inline; font-weight: normal; margin-right: 10px; }
        button { background: #007bff; color: white; padding: 12px 24px; border: none; border-radius: 4px; cursor: pointer; margin-top: 20px; }
        button.secondary { background: #6c757d; }
        .score { background: #d4edda; color: #155724; padding: 15px; border-radius: 5px; font-size: 18px; }
        .error { background: #f8d7da; color: #721c24; padding: 15px; border-radius: 5px; }
        .report { display: grid; grid-template-columns: 3fr 2fr; gap: 30px; }
        .chart { display: flex; align-items: flex-end; height: 240px; gap: 6px; border-bottom: 1px solid #333; }
        .bar { flex: 1; background: #5b9bd5; position: relative; }
        .bar span { position: absolute; top: -18px; width: 100%; text-align: center; font-size: 10px; }
        .chart-labels { display: flex; gap: 6px; }
        .chart-labels div { flex: 1; font-size: 10px; transform: rotate(-35deg); transform-origin: top right; text-align: right; height: 60px; }
    </style>
</head>
<body>
    <aside>
        <label>Choose Regression Model</label>
        <div id="models"></div>
        <p>Input student details below:</p>
    </aside>
    <main>
        <h1>Student Performance Analyzer</h1>
        <div class="columns">
            <div>
                <div class="form-group"><label>Gender</label><div class="radio-row" id="gender"></div></div>
                <div class="form-group"><label for="age">Age (years)</label><input type="number" id="age" min="10" max="100" value="20"></div>
                <div class="form-group"><label for="department">Department</label><select id="department"></select></div>
                <div class="form-group"><label>Attendance (%) <output id="attendance-out"></output></label><input type="range" id="attendance" min="0" max="100" step="0.1" value="85"></div>
                <div class="form-group"><label>Extracurricular Activities</label><div class="radio-row" id="extracurricular"></div></div>
                <div class="form-group"><label>Internet Access at Home</label><div class="radio-row" id="internet"></div></div>
            </div>
            <div>
                <div class="form-group"><label>Midterm Score <output id="midterm-out"></output></label><input type="range" id="midterm" min="0" max="100" step="0.1" value="75"></div>
                <div class="form-group"><label>Final Score <output id="final-out"></output></label><input type="range" id="final" min="0" max="100" step="0.1" value="80"></div>
                <div class="form-group"><label>Assignments Average <output id="assignments-out"></output></label><input type="range" id="assignments" min="0" max="100" step="0.1" value="70"></div>
                <div class="form-group"><label>Quizzes Average <output id="quizzes-out"></output></label><input type="range" id="quizzes" min="0" max="100" step="0.1" value="80"></div>
                <div class="form-group"><label>Participation <output id="participation-out"></output></label><input type="range" id="participation" min="0" max="100" step="0.1" value="78"></div>
                <div class="form-group"><label>Projects Total <output id="projects-out"></output></label><input type="range" id="projects" min="0" max="100" step="0.1" value="90"></div>
            </div>
            <div>
                <div class="form-group"><label for="grade">Grade</label><select id="grade"></select></div>
                <div class="form-group"><label>Weekly Study Hours <output id="study_hours-out"></output></label><input type="range" id="study_hours" min="0" max="100" step="0.1" value="10"></div>
                <div class="form-group"><label for="parent_education">Parent's Education</label><select id="parent_education"></select></div>
                <div class="form-group"><label for="family_income">Family Income</label><select id="family_income"></select></div>
                <div class="form-group"><label>Self-evaluated Stress (1-10) <output id="stress-out"></output></label><input type="range" id="stress" min="1" max="10" step="0.1" value="5"></div>
                <div class="form-group"><label>Average Sleep (hours/night) <output id="sleep-out"></output></label><input type="range" id="sleep" min="0" max="24" step="0.1" value="8"></div>
            </div>
        </div>

        <button onclick="getReport()">Get Performance Report</button>
        <button class="secondary" onclick="downloadFeatures()">Download Inputs (CSV)</button>

        <div id="result"></div>
    </main>

    <script>
        const sliders = ['attendance', 'midterm', 'final', 'assignments', 'quizzes', 'participation', 'projects', 'study_hours', 'stress', 'sleep'];

        function radios(id, name, options) {
            document.getElementById(id).innerHTML = options.map((option, i) =>
                `<label><input type="radio" name="${name}" value="${option}" ${i === 0 ? 'checked' : ''}> ${option}</label>`
            ).join('');
        }

        function selects(id, options) {
            document.getElementById(id).innerHTML = options.map(option => `<option>${option}</option>`).join('');
        }

        function checked(name) {
            return document.querySelector(`input[name="${name}"]:checked`).value;
        }

        async function loadSchema() {
            const response = await fetch('/schema');
            const schema = await response.json();
            radios('models', 'model', schema.models);
            radios('gender', 'gender', schema.categories.gender);
            radios('extracurricular', 'extracurricular', schema.categories.yes_no);
            radios('internet', 'internet', schema.categories.yes_no);
            selects('department', schema.categories.department);
            selects('grade', schema.categories.grade);
            selects('parent_education', schema.categories.parent_education);
            selects('family_income', schema.categories.family_income);
            sliders.forEach(id => {
                const input = document.getElementById(id);
                const out = document.getElementById(id + '-out');
                out.textContent = input.value;
                input.addEventListener('input', () => out.textContent = input.value);
            });
        }

        function collect() {
            const body = {
                model: checked('model'),
                gender: checked('gender'),
                age: parseInt(document.getElementById('age').value, 10),
                department: document.getElementById('department').value,
                grade: document.getElementById('grade').value,
                extracurricular: checked('extracurricular'),
                internet: checked('internet'),
                parent_education: document.getElementById('parent_education').value,
                family_income: document.getElementById('family_income').value
            };
            sliders.forEach(id => body[id] = parseFloat(document.getElementById(id).value));
            return body;
        }

        function renderChart(chart) {
            const max = Math.max(1, ...chart.values.map(Math.abs));
            const bars = chart.values.map(value =>
                `<div class="bar" style="height: ${Math.max(0, value) / max * 100}%"><span>${value}</span></div>`
            ).join('');
            const labels = chart.labels.map(label => `<div>${label}</div>`).join('');
            return `<h3>Profile Attributes Input Summary</h3><div class="chart">${bars}</div><div class="chart-labels">${labels}</div>`;
        }

        async function getReport() {
            const resultDiv = document.getElementById('result');
            try {
                const response = await fetch('/report', {
                    method: 'POST',
                    headers: {'Content-Type': 'application/json'},
                    body: JSON.stringify(collect())
                });
                const data = await response.json();
                if (!response.ok) {
                    throw new Error(data.error || response.statusText);
                }
                resultDiv.innerHTML = `
                    <hr>
                    <h2>Personalized Student Performance Report</h2>
                    <div class="report">
                        <div>
                            <div class="score">Score Prediction: ${data.score.toFixed(2)}</div>
                            <h3>Performance Star Rating: ${data.stars} (${data.rating}/5)</h3>
                            <h3>Suggestions to Improve Performance:</h3>
                            <ul>${data.advice.map(advice => `<li>${advice}</li>`).join('')}</ul>
                        </div>
                        <div>${renderChart(data.chart)}</div>
                    </div>
                `;
            } catch (error) {
                resultDiv.innerHTML = `<p class="error">Error: ${error.message}</p>`;
            }
        }

        async function downloadFeatures() {
            const response = await fetch('/report/features.csv', {
                method: 'POST',
                headers: {'Content-Type': 'application/json'},
                body: JSON.stringify(collect())
            });
            if (!response.ok) {
                const data = await response.json();
                document.getElementById('result').innerHTML = `<p class="error">Error: ${data.error}</p>`;
                return;
            }
            const link = document.createElement('a');
            link.href = URL.createObjectURL(await response.blob());
            link.download = 'profile_features.csv';
            link.click();
        }

        loadSchema();
    </script>
</body>
</html>
"#;
