use leptos::prelude::*;

use crate::commands::TrialSection;

/// Color values and predicted concentrations for one trial.
#[component]
pub fn TrialTables(section: TrialSection) -> impl IntoView {
    let has_colors = !section.color_rows.is_empty();

    let color_rows = section
        .color_rows
        .into_iter()
        .map(|row| {
            view! {
                <tr>
                    <td>{row.well}</td>
                    <td>{row.r}</td>
                    <td>{row.g}</td>
                    <td>{row.b}</td>
                    <td>{row.rgb_mean}</td>
                    <td>{row.s_mean}</td>
                </tr>
            }
        })
        .collect::<Vec<_>>();

    let concentration_rows = section
        .concentration_rows
        .into_iter()
        .map(|row| {
            view! {
                <tr>
                    <td>{row.well_number}</td>
                    <td>{row.r_value}</td>
                    <td class="predicted">{row.predicted}</td>
                </tr>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <section class="trial-section">
            <style>{include_str!("trial_tables.css")}</style>
            <h3 class="trial-title">{section.title}</h3>

            {has_colors.then(|| view! {
                <h4 class="subsection-title">"Color Values"</h4>
                <div class="table-container">
                    <table class="data-table">
                        <thead>
                            <tr>
                                <th>"Well"</th>
                                <th>"R"</th>
                                <th>"G"</th>
                                <th>"B"</th>
                                <th>"RGB"</th>
                                <th>"S"</th>
                            </tr>
                        </thead>
                        <tbody>{color_rows}</tbody>
                    </table>
                </div>
            })}

            <h4 class="subsection-title">"Predicted Concentrations"</h4>
            <div class="table-container">
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Well"</th>
                            <th>"R Value"</th>
                            <th>"Pred Conc"</th>
                        </tr>
                    </thead>
                    <tbody>{concentration_rows}</tbody>
                </table>
            </div>
        </section>
    }
}
