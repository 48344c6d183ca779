// Local roadmap catalog used when the roadmap service is unavailable.

use crate::career::models::CareerPath;
use crate::views::roadmap::{Phase, Task};

pub(crate) struct Template {
    pub description: &'static str,
    pub timeline: &'static str,
    pub salary_range: &'static str,
    pub demand_level: &'static str,
    pub skills_required: &'static [&'static str],
    pub phases: Vec<Phase>,
}

pub(crate) fn template_for(career: &str, path: CareerPath) -> Template {
    match career {
        "Software Engineer" => software_engineer(),
        "Product Manager" => product_manager(),
        _ => data_analyst(path),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn phase(
    id: &str,
    name: &str,
    number: u32,
    duration: &str,
    description: String,
    difficulty: &str,
    tasks: Vec<Task>,
) -> Phase {
    Phase {
        id: id.to_string(),
        name: name.to_string(),
        number,
        duration: duration.to_string(),
        description,
        difficulty: difficulty.to_string(),
        locked: false,
        tasks,
    }
}

fn data_analyst(path: CareerPath) -> Template {
    let execution_target = match path {
        CareerPath::Internship => "internship",
        CareerPath::Placement => "placements",
        CareerPath::Studies => "higher studies",
    };

    Template {
        description: "Transform raw data into actionable business insights",
        timeline: "12-16 weeks",
        salary_range: "$60K - $95K",
        demand_level: "Very High",
        skills_required: &["Python", "SQL", "Excel", "Power BI", "Statistics"],
        phases: vec![
            phase(
                "foundation",
                "Foundation Phase",
                1,
                "4-6 weeks",
                "Master core technical skills and tools".to_string(),
                "Intermediate",
                vec![
                    Task {
                        id: "python-basics".to_string(),
                        title: "Python for Data Analysis".to_string(),
                        description: "Master Python fundamentals, NumPy, Pandas libraries for data manipulation".to_string(),
                        priority: "High".to_string(),
                        difficulty: "Intermediate".to_string(),
                        reason: "Python is the most demanded tool for data analysts. 85% of job postings require Python.".to_string(),
                        impact: "Resume score +15%. Direct skill match.".to_string(),
                        estimated_days: 21,
                        estimated_hours: 60,
                        salary_impact: "+$5K/year".to_string(),
                        resources: strings(&[
                            "Python for Data Analysis - O'Reilly",
                            "DataCamp Python course",
                            "Real datasets on Kaggle",
                        ]),
                        xp_reward: 350,
                        locked: false,
                        skills: strings(&["Python", "NumPy", "Pandas"]),
                    },
                    Task {
                        id: "sql-mastery".to_string(),
                        title: "SQL for Data Querying & Analysis".to_string(),
                        description: "Write complex queries, optimize performance, understand database design".to_string(),
                        priority: "High".to_string(),
                        difficulty: "Intermediate".to_string(),
                        reason: "SQL is the gatekeeper to data. 95%+ of analyst roles require SQL proficiency.".to_string(),
                        impact: "Resume score +18%. Interview readiness +40%.".to_string(),
                        estimated_days: 21,
                        estimated_hours: 50,
                        salary_impact: "+$8K/year".to_string(),
                        resources: strings(&[
                            "SQL HackerRank",
                            "LeetCode Database",
                            "Mode Analytics SQL Tutorial",
                        ]),
                        xp_reward: 400,
                        locked: false,
                        skills: strings(&["SQL", "Database Design", "Query Optimization"]),
                    },
                    Task {
                        id: "power-bi".to_string(),
                        title: "Power BI & Dashboard Creation".to_string(),
                        description: "Create interactive dashboards, visualizations that tell stories with data".to_string(),
                        priority: "High".to_string(),
                        difficulty: "Beginner".to_string(),
                        reason: "Visualization is how analysts communicate insights. Power BI skills in 70% of job postings.".to_string(),
                        impact: "Resume score +12%. Portfolio boost.".to_string(),
                        estimated_days: 14,
                        estimated_hours: 35,
                        salary_impact: "+$4K/year".to_string(),
                        resources: strings(&[
                            "Microsoft Learn Power BI",
                            "Power BI YouTube tutorials",
                            "Sample datasets",
                        ]),
                        xp_reward: 300,
                        locked: false,
                        skills: strings(&["Power BI", "Tableau", "Data Visualization"]),
                    },
                ],
            ),
            phase(
                "portfolio",
                "Portfolio Phase",
                2,
                "3-4 weeks",
                "Build real-world projects to showcase skills".to_string(),
                "Intermediate",
                vec![
                    Task {
                        id: "project-ecommerce".to_string(),
                        title: "E-Commerce Analysis Project".to_string(),
                        description: "Analyze sales data, customer behavior, identify growth opportunities".to_string(),
                        priority: "High".to_string(),
                        difficulty: "Intermediate".to_string(),
                        reason: "Portfolio projects are the strongest signal. Hiring managers want to see proven work.".to_string(),
                        impact: "Resume score +25%. Sets you apart from 80% of candidates.".to_string(),
                        estimated_days: 14,
                        estimated_hours: 40,
                        salary_impact: "+$10K/year".to_string(),
                        resources: strings(&[
                            "Kaggle ecommerce datasets",
                            "Case study templates",
                            "GitHub for hosting",
                        ]),
                        xp_reward: 500,
                        locked: false,
                        skills: strings(&["SQL", "Python", "Data Visualization"]),
                    },
                    Task {
                        id: "project-financial".to_string(),
                        title: "Financial Analysis Dashboard".to_string(),
                        description: "Build comprehensive financial dashboard with trends, forecasts, and KPIs".to_string(),
                        priority: "High".to_string(),
                        difficulty: "Intermediate".to_string(),
                        reason: "Finance sector is high-paying. Financial analysis skills command premium salaries.".to_string(),
                        impact: "Resume score +20%. Opens finance sector opportunities.".to_string(),
                        estimated_days: 12,
                        estimated_hours: 35,
                        salary_impact: "+$15K/year".to_string(),
                        resources: strings(&[
                            "Financial datasets",
                            "Power BI advanced features",
                            "Case study examples",
                        ]),
                        xp_reward: 450,
                        locked: true,
                        skills: strings(&["SQL", "Excel", "Power BI", "Financial Analysis"]),
                    },
                ],
            ),
            phase(
                "industry",
                "Industry Readiness",
                3,
                "4-6 weeks",
                "Prepare for interviews and real-world scenarios".to_string(),
                "Intermediate",
                vec![
                    Task {
                        id: "interview-technical".to_string(),
                        title: "Technical Interview Preparation".to_string(),
                        description: "Master SQL queries, coding problems, statistics questions, case studies".to_string(),
                        priority: "High".to_string(),
                        difficulty: "Intermediate".to_string(),
                        reason: "Technical interviews filter 80% of candidates. Preparation is non-negotiable.".to_string(),
                        impact: "Interview success rate increases 65%+. Offer negotiations improve.".to_string(),
                        estimated_days: 21,
                        estimated_hours: 60,
                        salary_impact: "+$8K/year".to_string(),
                        resources: strings(&[
                            "LeetCode Database problems",
                            "Mode Analytics",
                            "System Design interviews",
                        ]),
                        xp_reward: 400,
                        locked: false,
                        skills: strings(&["SQL", "Problem Solving", "Statistics"]),
                    },
                    Task {
                        id: "behavioral-prep".to_string(),
                        title: "Behavioral & Communication Mastery".to_string(),
                        description: "Master STAR method, storytelling, communication of technical concepts".to_string(),
                        priority: "High".to_string(),
                        difficulty: "Beginner".to_string(),
                        reason: "Behavioral skills determine if you pass phone screens. Technical skills get interviews.".to_string(),
                        impact: "Phone screen pass rate increases 80%+.".to_string(),
                        estimated_days: 7,
                        estimated_hours: 20,
                        salary_impact: "+$3K/year".to_string(),
                        resources: strings(&[
                            "STAR method guides",
                            "Mock interview platforms",
                            "Communication courses",
                        ]),
                        xp_reward: 250,
                        locked: false,
                        skills: strings(&["Communication", "Problem Solving", "STAR Method"]),
                    },
                ],
            ),
            phase(
                "execution",
                "Execution Phase",
                4,
                "8-12 weeks",
                format!("Execute {execution_target} strategy"),
                "Advanced",
                vec![
                    Task {
                        id: "job-applications".to_string(),
                        title: "Strategic Job Search & Applications".to_string(),
                        description: "Apply to 30-50 companies, optimize resume/profile for ATS, track applications".to_string(),
                        priority: "High".to_string(),
                        difficulty: "Advanced".to_string(),
                        reason: "Volume + Quality = Success. Apply smartly to high-match companies.".to_string(),
                        impact: "Increases offer probability by 300%+.".to_string(),
                        estimated_days: 30,
                        estimated_hours: 80,
                        salary_impact: "+$12K/year baseline".to_string(),
                        resources: strings(&[
                            "LinkedIn optimization",
                            "ATS scanner tools",
                            "Salary negotiation guides",
                        ]),
                        xp_reward: 600,
                        locked: true,
                        skills: strings(&["Networking", "Resume Optimization", "Application Strategy"]),
                    },
                    Task {
                        id: "offer-negotiation".to_string(),
                        title: "Offer Evaluation & Negotiation".to_string(),
                        description: "Evaluate offers, negotiate salary, benefits, title, growth opportunities".to_string(),
                        priority: "Critical".to_string(),
                        difficulty: "Advanced".to_string(),
                        reason: "Smart negotiation can add $100K+ over 5 years. First offer is not final.".to_string(),
                        impact: "Potential $15K-$30K+ salary increase + better benefits.".to_string(),
                        estimated_days: 5,
                        estimated_hours: 10,
                        salary_impact: "+$15K-$30K/year".to_string(),
                        resources: strings(&[
                            "Salary negotiation guides",
                            "Market rate research",
                            "Offer evaluation templates",
                        ]),
                        xp_reward: 400,
                        locked: true,
                        skills: strings(&["Negotiation", "Market Research", "Decision Making"]),
                    },
                ],
            ),
        ],
    }
}

fn software_engineer() -> Template {
    Template {
        description: "Build scalable applications and solve complex technical problems",
        timeline: "16-20 weeks",
        salary_range: "$80K - $150K+",
        demand_level: "Very High",
        skills_required: &["Python/Java", "System Design", "Data Structures", "Git", "AWS/GCP"],
        phases: vec![phase(
            "foundation",
            "Foundation Phase",
            1,
            "6-8 weeks",
            "Master programming fundamentals and core data structures".to_string(),
            "Intermediate",
            vec![Task {
                id: "dsa-fundamentals".to_string(),
                title: "Data Structures & Algorithms Mastery".to_string(),
                description: "Arrays, LinkedLists, Stacks, Queues, Trees, Graphs, Dynamic Programming".to_string(),
                priority: "Critical".to_string(),
                difficulty: "Intermediate".to_string(),
                reason: "DSA is 70% of technical interviews. Weak DSA means automatic rejection.".to_string(),
                impact: "Interview pass rate increases 75%+.".to_string(),
                estimated_days: 35,
                estimated_hours: 100,
                salary_impact: "+$20K/year".to_string(),
                resources: strings(&["LeetCode", "AlgoExpert", "Striver DSA series"]),
                xp_reward: 600,
                locked: false,
                skills: strings(&["DSA", "Problem Solving", "Algorithms"]),
            }],
        )],
    }
}

fn product_manager() -> Template {
    Template {
        description: "Lead product strategy and drive user value",
        timeline: "10-14 weeks",
        salary_range: "$100K - $200K+",
        demand_level: "High",
        skills_required: &[
            "Product Strategy",
            "Analytics",
            "Communication",
            "Leadership",
            "Market Research",
        ],
        phases: vec![phase(
            "foundation",
            "Foundation Phase",
            1,
            "3-4 weeks",
            "Understand product fundamentals and frameworks".to_string(),
            "Beginner",
            vec![Task {
                id: "pm-frameworks".to_string(),
                title: "Product Management Frameworks & Methodologies".to_string(),
                description: "Learn RICE prioritization, OKRs, user research, competitive analysis".to_string(),
                priority: "High".to_string(),
                difficulty: "Beginner".to_string(),
                reason: "PM frameworks guide all decision-making. Essential for interviews.".to_string(),
                impact: "Interview readiness +40%. Project capability +100%.".to_string(),
                estimated_days: 14,
                estimated_hours: 40,
                salary_impact: "+$8K/year".to_string(),
                resources: strings(&[
                    "Reforge PM courses",
                    "Lean Product Playbook",
                    "Case study interviews",
                ]),
                xp_reward: 300,
                locked: false,
                skills: strings(&["Product Strategy", "Market Research", "Analytics"]),
            }],
        )],
    }
}
