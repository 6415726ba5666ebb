//! HTML templates
//!
//! Hand-built markup, HTMX for the interactive parts. User-entered text
//! always goes through [`html_escape`].

use stay_core::{
    format_delta, format_won, html_escape, Amenity, ComparableListing, PropertyDraft,
    AMENITIES, BATHROOM_CHOICES, BEDROOM_CHOICES, GUEST_CHOICES, PROPERTY_TYPES,
};
use stay_predict::{Analysis, AnalysisStage, StageMarker, ViewerPhase};
use stay_wizard::{DraftPreview, IntakeWizard, StepMarker, WizardStep};

/// Element the result map is drawn into
pub const MAP_CONTAINER: &str = "price-map";

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.10";
const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// CSS styles
pub const STYLE_CSS: &str = r#"
:root {
    --bg: #f5f5f7;
    --card: #ffffff;
    --ink: #111111;
    --muted: #6b7280;
    --line: #e5e7eb;
    --accent: #111111;
    --good: #16a34a;
    --bad: #dc2626;
}

* { margin: 0; padding: 0; box-sizing: border-box; }

body {
    font-family: -apple-system, 'Pretendard', 'Noto Sans KR', sans-serif;
    background: var(--bg);
    color: var(--ink);
    line-height: 1.6;
}

a { color: inherit; }

.topbar {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 16px 32px;
    background: rgba(255, 255, 255, 0.85);
    border-bottom: 1px solid var(--line);
}

.brand { font-weight: 700; font-size: 1.2em; text-decoration: none; }

.container { max-width: 1100px; margin: 0 auto; padding: 32px 16px; }

.card {
    background: var(--card);
    border-radius: 16px;
    box-shadow: 0 8px 30px rgba(0, 0, 0, 0.06);
    padding: 24px;
    margin-bottom: 24px;
}

.muted { color: var(--muted); }

.hero { text-align: center; padding: 80px 16px; }
.hero h1 { font-size: 2.6em; line-height: 1.2; margin-bottom: 16px; }

.button {
    display: inline-block;
    padding: 12px 24px;
    border-radius: 10px;
    border: 1px solid var(--accent);
    background: var(--accent);
    color: #fff;
    font-size: 1em;
    cursor: pointer;
    text-decoration: none;
}

.button.outline { background: transparent; color: var(--accent); }
.button:disabled { opacity: 0.35; cursor: not-allowed; }

.grid { display: grid; gap: 16px; }
.grid.two { grid-template-columns: repeat(2, 1fr); }
.grid.three { grid-template-columns: repeat(3, 1fr); }
.grid.four { grid-template-columns: repeat(4, 1fr); }

.progress { height: 8px; background: var(--line); border-radius: 4px; overflow: hidden; }
.progress-bar { height: 100%; background: var(--accent); transition: width 0.3s; }

.steps { display: flex; gap: 24px; list-style: none; margin: 16px 0; }
.step { display: flex; align-items: center; gap: 8px; color: var(--muted); }
.step-num {
    width: 28px; height: 28px;
    border-radius: 50%;
    display: flex; align-items: center; justify-content: center;
    background: var(--line);
}
.step-done .step-num { background: var(--good); color: #fff; }
.step-current { color: var(--ink); font-weight: 600; }
.step-current .step-num { background: var(--accent); color: #fff; }

.wizard-layout { display: grid; grid-template-columns: 2fr 1fr; gap: 24px; }

.option {
    padding: 16px;
    border: 2px solid var(--line);
    border-radius: 12px;
    background: var(--card);
    text-align: left;
    cursor: pointer;
}
.option small { display: block; color: var(--muted); }
.option.selected { border-color: var(--accent); background: #f3f4f6; }

.chips { display: flex; flex-wrap: wrap; gap: 8px; }
.chip { padding: 8px 14px; border-radius: 999px; border: 1px solid var(--line); background: var(--card); cursor: pointer; }
.chip.selected { background: var(--accent); color: #fff; border-color: var(--accent); }

.field { margin: 20px 0; }
.field label { display: block; font-weight: 600; margin-bottom: 8px; }
.field input[type=text] { width: 100%; padding: 12px; border: 1px solid var(--line); border-radius: 10px; font-size: 1em; }

.suggestions { list-style: none; border: 1px solid var(--line); border-radius: 10px; margin-top: 4px; }
.suggestions:empty { display: none; }
.suggestions button { width: 100%; padding: 10px 12px; border: 0; background: none; text-align: left; cursor: pointer; }
.suggestions button:hover { background: #f3f4f6; }

.notice { padding: 12px 16px; border-radius: 10px; background: #fef3c7; margin: 12px 0; }

.wizard-nav { display: flex; justify-content: space-between; margin-top: 24px; }

.preview dt { color: var(--muted); font-size: 0.85em; }
.preview dd { margin-bottom: 10px; }

.stage-list { list-style: none; margin-top: 24px; text-align: left; }
.stage { display: flex; gap: 12px; align-items: center; color: var(--muted); padding: 4px 0; }
.stage-done, .stage-active { color: var(--good); }
.stage-dot { width: 18px; height: 18px; border-radius: 50%; background: var(--line); }
.stage-done .stage-dot { background: var(--good); }
.stage-active .stage-dot { background: var(--accent); }

.loading { max-width: 460px; margin: 80px auto; text-align: center; }

.price { font-size: 3em; font-weight: 700; }

.badge { display: inline-block; padding: 2px 10px; border-radius: 999px; font-size: 0.85em; }
.badge.good { background: #dcfce7; color: var(--good); }
.badge.bad { background: #fee2e2; color: var(--bad); }

.factor { display: flex; justify-content: space-between; padding: 10px 0; border-bottom: 1px solid var(--line); }

.map { height: 360px; border-radius: 12px; background: #e5e7eb; }

.listing { border: 1px solid var(--line); border-radius: 12px; padding: 16px; }

footer { text-align: center; padding: 32px; color: var(--muted); font-size: 0.85em; }
"#;

/// Page shell shared by the three screens
fn page(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | AirPrice Insight</title>
    <link rel="stylesheet" href="/static/style.css">
    <script src="{HTMX_SRC}"></script>
    {head_extra}
</head>
<body>
    <header class="topbar">
        <a class="brand" href="/">AirPrice Insight</a>
        <a class="button" href="/predict">가격 예측하기</a>
    </header>
    {body}
    <footer>© AirPrice Insight</footer>
</body>
</html>"#,
        title = html_escape(title),
    )
}

// ============== Landing ==============

pub fn landing_html() -> String {
    let features = [
        ("AI 가격 예측", "머신러닝 모델로 정확한 가격 예측"),
        ("지도 시각화", "주변 숙소 가격 분포를 한눈에"),
        ("유사 매물 비교", "비슷한 조건의 숙소와 가격 비교"),
        ("즉시 분석", "실시간 가격 분석 및 추천"),
    ];
    let steps = [
        ("숙소 정보 입력", "위치, 숙소 유형, 편의시설 등 기본 정보를 입력하세요"),
        ("AI 분석", "머신러닝 모델이 주변 시세와 특성을 분석합니다"),
        ("결과 확인", "예측 가격과 상세 분석 리포트를 확인하세요"),
    ];

    let feature_cards: String = features
        .iter()
        .map(|(title, text)| {
            format!(r#"<div class="card"><h3>{title}</h3><p class="muted">{text}</p></div>"#)
        })
        .collect();
    let step_cards: String = steps
        .iter()
        .enumerate()
        .map(|(i, (title, text))| {
            format!(
                r#"<div class="card"><div class="step-num">{}</div><h3>{title}</h3><p class="muted">{text}</p></div>"#,
                i + 1
            )
        })
        .collect();

    let body = format!(
        r#"<section class="hero">
        <h1>에어비앤비 가격을<br><span class="muted">정확하게 예측하세요</span></h1>
        <p class="muted">머신러닝 기반 가격 예측과 주변 시세 분석으로<br>최적의 숙소 가격을 설정해보세요</p>
        <p style="margin-top: 32px;"><a class="button" href="/predict">지금 가격 예측하기</a></p>
    </section>
    <main class="container">
        <h2>핵심 기능</h2>
        <p class="muted">데이터 기반의 정확한 가격 예측 서비스</p>
        <div class="grid four" style="margin: 24px 0 48px;">{feature_cards}</div>
        <h2>사용법</h2>
        <p class="muted">3단계로 간단하게 가격을 예측하세요</p>
        <div class="grid three" style="margin-top: 24px;">{step_cards}</div>
    </main>"#
    );
    page("AI 가격 예측", "", &body)
}

// ============== Wizard ==============

pub fn predict_page_html(wizard: &IntakeWizard) -> String {
    let body = format!(
        r#"<main class="container">{}</main>"#,
        wizard_html(wizard, None)
    );
    page("숙소 정보 입력", "", &body)
}

/// The whole wizard panel. Every action inside it swaps the panel.
pub fn wizard_html(wizard: &IntakeWizard, notice: Option<&str>) -> String {
    let step = wizard.step();
    let markers: String = WizardStep::ALL
        .iter()
        .map(|s| {
            let (class, mark) = match s.marker(step) {
                StepMarker::Done => ("step-done", "✓".to_string()),
                StepMarker::Current => ("step-current", s.number().to_string()),
                StepMarker::Upcoming => ("step-upcoming", s.number().to_string()),
            };
            format!(
                r#"<li class="step {class}"><span class="step-num">{mark}</span>{}</li>"#,
                s.title()
            )
        })
        .collect();

    let notice = notice
        .map(|n| format!(r#"<div class="notice">{}</div>"#, html_escape(n)))
        .unwrap_or_default();

    let body = match step {
        WizardStep::BasicInfo => basic_info_html(wizard),
        WizardStep::Capacity => capacity_html(wizard.draft()),
        WizardStep::Amenities => amenities_html(wizard.draft()),
    };

    format!(
        r#"<section id="wizard" hx-target="this" hx-swap="outerHTML">
    <div class="progress"><div class="progress-bar" style="width: {percent}%"></div></div>
    <p class="muted">{number} / {total} 단계</p>
    <ol class="steps">{markers}</ol>
    {notice}
    <div class="wizard-layout">
        <div class="card">
            <h2>{title}</h2>
            <p class="muted">{subtitle}</p>
            {body}
            {nav}
        </div>
        {preview}
    </div>
</section>"#,
        percent = wizard.progress_percent(),
        number = step.number(),
        total = WizardStep::ALL.len(),
        title = step.title(),
        subtitle = step.subtitle(),
        nav = nav_html(wizard, false),
        preview = preview_html(&wizard.preview(), false),
    )
}

fn basic_info_html(wizard: &IntakeWizard) -> String {
    let draft = wizard.draft();
    let types: String = PROPERTY_TYPES
        .iter()
        .map(|option| {
            let selected = selected_class(draft.property_type == Some(option.kind));
            format!(
                r#"<button type="button" class="option{selected}" name="property_type" value="{}" hx-post="/predict/type">{}<small>{}</small></button>"#,
                option.kind.id(),
                option.label,
                option.description
            )
        })
        .collect();

    format!(
        r##"<div class="field">
    <label>숙소 유형</label>
    <div class="grid three">{types}</div>
</div>
<div class="field">
    <label for="address">주소</label>
    <div hx-get="/htmx/suggestions" hx-trigger="focusin" hx-include="find input" hx-target="#suggestions">
        <input id="address" type="text" name="address" value="{address}" placeholder="주소를 입력하세요" autocomplete="off"
            hx-post="/predict/address" hx-trigger="input changed delay:200ms" hx-target="#suggestions">
    </div>
    {suggestions}
</div>"##,
        address = html_escape(&draft.address),
        suggestions = suggestions_html(&wizard.suggestions()),
    )
}

/// Suggestion list, swapped on its own while the host types
pub fn suggestions_html(suggestions: &[&str]) -> String {
    let items: String = suggestions
        .iter()
        .map(|s| {
            let escaped = html_escape(s);
            format!(
                r##"<li><button type="button" name="address" value="{escaped}" hx-post="/predict/suggestion" hx-target="#wizard">{escaped}</button></li>"##
            )
        })
        .collect();
    format!(r#"<ul id="suggestions" class="suggestions">{items}</ul>"#)
}

fn capacity_html(draft: &PropertyDraft) -> String {
    format!(
        "{}{}{}",
        choice_row("침실 수", "bedrooms", &BEDROOM_CHOICES, draft.bedroom_count, "개"),
        choice_row("욕실 수", "bathrooms", &BATHROOM_CHOICES, draft.bathroom_count, "개"),
        choice_row("최대 인원", "guests", &GUEST_CHOICES, draft.max_guests, "명"),
    )
}

fn choice_row(label: &str, field: &str, choices: &[u32], current: Option<u32>, unit: &str) -> String {
    let chips: String = choices
        .iter()
        .map(|n| {
            format!(
                r#"<button type="button" class="chip{}" name="{field}" value="{n}" hx-post="/predict/capacity">{n}{unit}</button>"#,
                selected_class(current == Some(*n))
            )
        })
        .collect();
    format!(r#"<div class="field"><label>{label}</label><div class="chips">{chips}</div></div>"#)
}

fn amenities_html(draft: &PropertyDraft) -> String {
    let chips: String = AMENITIES
        .iter()
        .map(|option| {
            format!(
                r#"<button type="button" class="chip{}" name="amenity" value="{}" hx-post="/predict/amenity">{}</button>"#,
                selected_class(draft.selected_amenities.contains(&option.amenity)),
                option.amenity.id(),
                option.label
            )
        })
        .collect();
    format!(r#"<div class="field"><div class="chips">{chips}</div></div>"#)
}

/// Back/next/submit buttons. Disabled exactly when the wizard would refuse.
pub fn nav_html(wizard: &IntakeWizard, oob: bool) -> String {
    let back = format!(
        r#"<button type="button" class="button outline" hx-post="/predict/back"{}>이전</button>"#,
        disabled(!wizard.can_retreat())
    );
    let forward = if wizard.step().is_last() {
        format!(
            r#"<button type="button" class="button" hx-post="/predict/submit"{}>가격 예측하기</button>"#,
            disabled(!wizard.can_submit())
        )
    } else {
        format!(
            r#"<button type="button" class="button" hx-post="/predict/next"{}>다음</button>"#,
            disabled(!wizard.can_advance())
        )
    };
    format!(
        r#"<nav id="wizard-nav" class="wizard-nav"{}>{back}{forward}</nav>"#,
        oob_attr(oob)
    )
}

pub fn preview_html(preview: &DraftPreview, oob: bool) -> String {
    let amenities = if preview.amenities.is_empty() {
        r#"<span class="muted">선택된 편의시설 없음</span>"#.to_string()
    } else {
        let mut chips: String = preview
            .amenities
            .iter()
            .map(|label| format!(r#"<span class="badge good">{label}</span> "#))
            .collect();
        if let Some(overflow) = &preview.amenity_overflow {
            chips.push_str(&format!(r#"<span class="badge">{overflow}</span>"#));
        }
        chips
    };

    format!(
        r#"<aside id="preview" class="card preview"{oob}>
    <h3>입력 미리보기</h3>
    <dl>
        <dt>숙소 유형</dt><dd>{property_type}</dd>
        <dt>위치</dt><dd>{address}</dd>
        <dt>침실 / 욕실</dt><dd>{bedrooms} / {bathrooms}</dd>
        <dt>최대 인원</dt><dd>{guests}</dd>
        <dt>편의시설</dt><dd>{amenities}</dd>
    </dl>
    <p class="muted">{hint}</p>
</aside>"#,
        oob = oob_attr(oob),
        property_type = preview.property_type,
        address = html_escape(&preview.address),
        bedrooms = preview.bedrooms,
        bathrooms = preview.bathrooms,
        guests = preview.guests,
        hint = preview.hint,
    )
}

/// Response to an address edit: the list plus the parts of the panel that
/// depend on the address.
pub fn address_update_html(wizard: &IntakeWizard) -> String {
    format!(
        "{}{}{}",
        suggestions_html(&wizard.suggestions()),
        preview_html(&wizard.preview(), true),
        nav_html(wizard, true)
    )
}

// ============== Results ==============

pub fn results_page_html(panel: &str) -> String {
    let head = format!(
        r#"<link rel="stylesheet" href="{LEAFLET_CSS}">
    <script src="{LEAFLET_JS}"></script>"#
    );
    let body = format!(r#"<main class="container">{panel}</main>"#);
    page("예측 결과", &head, &body)
}

/// The result panel for a viewer phase. Loading panels poll themselves;
/// pending and ready panels are static.
pub fn results_panel_html(phase: &ViewerPhase, map_script: Option<&str>) -> String {
    match phase {
        ViewerPhase::Pending => pending_html(),
        ViewerPhase::Loading { stage, progress } => loading_html(*stage, *progress, true),
        ViewerPhase::Ready(analysis) => ready_html(analysis, map_script),
    }
}

fn loading_html(stage: AnalysisStage, progress: u8, poll: bool) -> String {
    let rows: String = AnalysisStage::ALL
        .iter()
        .map(|s| {
            let class = match s.marker(stage) {
                StageMarker::Done => "stage-done",
                StageMarker::Active => "stage-active",
                StageMarker::Waiting => "stage-waiting",
            };
            format!(
                r#"<li class="stage {class}"><span class="stage-dot"></span>{}</li>"#,
                s.message()
            )
        })
        .collect();

    let poll = if poll {
        r#" hx-get="/htmx/results" hx-trigger="every 500ms" hx-swap="outerHTML""#
    } else {
        ""
    };

    format!(
        r#"<section id="results" class="card loading"{poll}>
    <h2>AI 가격 분석 중</h2>
    <p class="muted">{message}</p>
    <div class="progress" style="margin-top: 24px;"><div class="progress-bar" style="width: {progress}%"></div></div>
    <p class="muted">{progress}% 완료</p>
    <ul class="stage-list">{rows}</ul>
</section>"#,
        message = stage.message(),
    )
}

/// Nothing was handed off: the loading card, frozen at its first stage.
fn pending_html() -> String {
    loading_html(AnalysisStage::FIRST, 0, false)
}

fn ready_html(analysis: &Analysis, map_script: Option<&str>) -> String {
    let prediction = &analysis.prediction;

    let factors: String = prediction
        .factors
        .iter()
        .map(|f| {
            format!(
                r#"<div class="factor"><div><strong>{}</strong><p class="muted">{}</p></div><span class="badge {}">{}</span></div>"#,
                html_escape(&f.name),
                html_escape(&f.description),
                if f.is_positive { "good" } else { "bad" },
                html_escape(&f.impact_label)
            )
        })
        .collect();

    let listings: String = analysis
        .comparables
        .iter()
        .map(|listing| listing_html(listing, prediction.delta_for(listing)))
        .collect();

    let map = match map_script {
        Some(script) => format!(
            r#"<div id="{MAP_CONTAINER}" class="map"></div><script>{script}</script>"#
        ),
        None => format!(r#"<div id="{MAP_CONTAINER}" class="map"></div>"#),
    };

    format!(
        r##"<section id="results">
    <div class="wizard-nav" style="margin-bottom: 24px;">
        <a class="button outline" href="/predict">다시 예측하기</a>
        <div>
            <span class="badge good">분석 완료</span>
            <button type="button" class="button outline" hx-post="/results/report" hx-target="#report-notice">PDF 다운로드</button>
        </div>
    </div>
    <div id="report-notice"></div>

    <div class="card">
        <h2>AI 가격 예측 결과</h2>
        <p class="muted">머신러닝 모델이 분석한 최적 가격을 확인하세요</p>
        <div class="grid two" style="margin-top: 16px;">
            <div>
                <div class="price">{price}</div>
                <p class="muted">예측 가격 (1박 기준)</p>
                <p>신뢰도 {confidence}% · 가격 범위 {range_min} ~ {range_max}</p>
            </div>
            {summary}
        </div>
    </div>

    <div class="grid two">
        <div class="card">
            <h3>주요 가격 요인</h3>
            {factors}
        </div>
        <div class="card">
            <h3>추천 가격 전략</h3>
            <p class="muted">데이터 기반의 가격 설정 전략을 제안드립니다</p>
            <div class="factor"><div><strong>최저 권장가</strong><p class="muted">빠른 예약 확보 및 초기 리뷰 수집에 유리</p></div><span>{discount}</span></div>
            <div class="factor"><div><strong>추천</strong><p class="muted">수익과 예약률의 최적 균형점</p></div><span>{price}</span></div>
            <div class="factor"><div><strong>프리미엄 가격</strong><p class="muted">높은 수익률 추구 (예약률 다소 감소 가능)</p></div><span>{premium}</span></div>
        </div>
    </div>

    <div class="card">
        <h3>주변 가격 분포</h3>
        <p class="muted">유사한 숙소들의 위치와 가격을 확인하세요</p>
        {map}
    </div>

    <div class="card">
        <h3>유사 매물 비교</h3>
        <p class="muted">비슷한 조건의 숙소들과 가격을 비교해보세요</p>
        <div class="grid three" style="margin-top: 16px;">{listings}</div>
    </div>
</section>"##,
        price = format_won(prediction.predicted_price),
        confidence = prediction.confidence,
        range_min = format_won(prediction.price_range.min),
        range_max = format_won(prediction.price_range.max),
        summary = draft_summary_html(&analysis.draft),
        discount = format_won(prediction.discount_price()),
        premium = format_won(prediction.premium_price()),
    )
}

fn draft_summary_html(draft: &PropertyDraft) -> String {
    let amenities = if draft.selected_amenities.is_empty() {
        "선택된 편의시설 없음".to_string()
    } else {
        draft
            .selected_amenities
            .iter()
            .map(Amenity::label)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let count = |n: Option<u32>| n.map(|n| n.to_string()).unwrap_or_else(|| "-".into());

    format!(
        r#"<dl class="preview">
    <dt>숙소 유형</dt><dd>{}</dd>
    <dt>위치</dt><dd>{}</dd>
    <dt>침실/욕실</dt><dd>{} / {}</dd>
    <dt>최대 인원</dt><dd>{}명</dd>
    <dt>편의시설</dt><dd>{}</dd>
</dl>"#,
        draft.property_type.map(|t| t.label()).unwrap_or("-"),
        html_escape(&draft.address),
        count(draft.bedroom_count),
        count(draft.bathroom_count),
        count(draft.max_guests),
        amenities
    )
}

fn listing_html(listing: &ComparableListing, delta: i64) -> String {
    format!(
        r#"<div class="listing">
    <strong>{name}</strong>
    <div class="price" style="font-size: 1.6em;">{price}</div>
    <p>⭐ {rating} · 거리: {distance}km</p>
    <p class="muted">침실/욕실: {bedrooms}/{bathrooms} · 최대 인원: {guests}명</p>
    <p>예측가 대비 <span class="badge {class}">{delta}</span></p>
</div>"#,
        name = html_escape(&listing.name),
        price = format_won(listing.price),
        rating = listing.rating,
        distance = listing.distance_km,
        bedrooms = listing.bedroom_count,
        bathrooms = listing.bathroom_count,
        guests = listing.max_guests,
        class = if delta > 0 { "bad" } else { "good" },
        delta = format_delta(delta),
    )
}

pub fn report_notice_html(message: &str) -> String {
    format!(r#"<div class="notice">{}</div>"#, html_escape(message))
}

fn selected_class(selected: bool) -> &'static str {
    if selected {
        " selected"
    } else {
        ""
    }
}

fn disabled(disabled: bool) -> &'static str {
    if disabled {
        " disabled"
    } else {
        ""
    }
}

fn oob_attr(oob: bool) -> &'static str {
    if oob {
        r#" hx-swap-oob="true""#
    } else {
        ""
    }
}
